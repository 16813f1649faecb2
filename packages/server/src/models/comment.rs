use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::Comment;
use crate::repository::RepoError;

use super::shared::{parse_optional_id, validate_length};

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub blog_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
}

#[derive(Deserialize, Default, PartialEq)]
pub struct UpdateCommentRequest {
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct CommentResponse {
    pub blog_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub created_date: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(c: Comment) -> Self {
        Self {
            blog_id: c.blog_id,
            user_id: c.user_id,
            message: c.message,
            created_date: c.created_date,
        }
    }
}

#[derive(Serialize)]
pub struct CommentListResponse {
    pub data: Vec<CommentResponse>,
}

/// Query string for listing comments.
#[derive(Deserialize, Default)]
pub struct CommentListQuery {
    pub blog_id: Option<String>,
    pub user_id: Option<String>,
}

/// Equality filters for listing comments.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CommentFilter {
    pub blog_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

impl TryFrom<CommentListQuery> for CommentFilter {
    type Error = RepoError;

    fn try_from(query: CommentListQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            blog_id: parse_optional_id(query.blog_id.as_deref(), "blog_id")?,
            user_id: parse_optional_id(query.user_id.as_deref(), "user_id")?,
        })
    }
}

pub fn validate_message(message: &str) -> Result<(), RepoError> {
    validate_length(message, "Message", 1, 2000)
}

pub fn validate_create_comment(payload: &CreateCommentRequest) -> Result<(), RepoError> {
    validate_message(&payload.message)
}
