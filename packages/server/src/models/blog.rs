use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::Blog;
use crate::repository::RepoError;

use super::shared::{filter_value, parse_optional_id, validate_title};

#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub user_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub score: f64,
}

#[derive(Deserialize, Default, PartialEq)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub score: Option<f64>,
}

#[derive(Serialize)]
pub struct BlogResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub score: f64,
    pub created_date: DateTime<Utc>,
}

impl From<Blog> for BlogResponse {
    fn from(b: Blog) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            title: b.title,
            score: b.score,
            created_date: b.created_date,
        }
    }
}

#[derive(Serialize)]
pub struct BlogListResponse {
    pub data: Vec<BlogResponse>,
}

/// Query string for listing blogs.
#[derive(Deserialize, Default)]
pub struct BlogListQuery {
    pub title: Option<String>,
    pub user_id: Option<String>,
}

/// Equality filters for listing blogs.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BlogFilter {
    pub title: Option<String>,
    pub user_id: Option<Uuid>,
}

impl TryFrom<BlogListQuery> for BlogFilter {
    type Error = RepoError;

    fn try_from(query: BlogListQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            title: filter_value(query.title),
            user_id: parse_optional_id(query.user_id.as_deref(), "user_id")?,
        })
    }
}

pub fn validate_score(score: f64) -> Result<(), RepoError> {
    if !score.is_finite() || score < 0.0 {
        return Err(RepoError::Validation(
            "Score must be a finite number >= 0".into(),
        ));
    }
    Ok(())
}

pub fn validate_create_blog(payload: &CreateBlogRequest) -> Result<(), RepoError> {
    validate_title(&payload.title)?;
    validate_score(payload.score)
}

/// Validate a blog after a patch has been applied.
pub fn validate_blog(blog: &Blog) -> Result<(), RepoError> {
    validate_title(&blog.title)?;
    validate_score(blog.score)
}
