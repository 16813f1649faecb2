use chrono::Utc;
use common::storage::{PutCondition, StoreError};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::codec::{Entity, attr};
use crate::entity::{Comment, EntityKind, EntityRef};
use crate::keys;
use crate::models::comment::{
    CommentFilter, CreateCommentRequest, UpdateCommentRequest, validate_create_comment,
    validate_message,
};

use super::{RepoError, Store};

#[derive(Clone)]
pub struct CommentRepository {
    store: Store,
}

impl CommentRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create the comment of `payload.user_id` on `payload.blog_id`. Both must
    /// exist, and a user has at most one comment per blog.
    #[instrument(
        skip(self, payload),
        fields(blog_id = %payload.blog_id, user_id = %payload.user_id)
    )]
    pub async fn create(&self, payload: CreateCommentRequest) -> Result<Comment, RepoError> {
        validate_create_comment(&payload)?;

        if !self.store.exists(&keys::user_key(payload.user_id)).await? {
            return Err(RepoError::ForeignKey(EntityRef::User {
                id: payload.user_id,
            }));
        }
        if !self.store.exists(&keys::blog_key(payload.blog_id)).await? {
            return Err(RepoError::ForeignKey(EntityRef::Blog {
                id: payload.blog_id,
            }));
        }

        let comment = Comment {
            blog_id: payload.blog_id,
            user_id: payload.user_id,
            message: payload.message.trim().to_string(),
            created_date: Utc::now(),
        };

        self.store
            .put(comment.encode(), PutCondition::NotExists)
            .await
            .map_err(|e| match e {
                StoreError::ConditionFailed(_) => {
                    RepoError::Conflict(comment.entity_ref().to_string())
                }
                other => other.into(),
            })?;

        info!("Comment created");
        Ok(comment)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, blog_id: Uuid, user_id: Uuid) -> Result<Comment, RepoError> {
        self.store
            .fetch(&keys::comment_key(blog_id, user_id))
            .await?
            .ok_or(RepoError::NotFound(EntityRef::Comment { blog_id, user_id }))
    }

    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        blog_id: Uuid,
        user_id: Uuid,
        patch: UpdateCommentRequest,
    ) -> Result<Comment, RepoError> {
        let mut comment = self.get(blog_id, user_id).await?;
        let Some(message) = patch.message else {
            return Ok(comment);
        };

        comment.message = message.trim().to_string();
        validate_message(&comment.message)?;

        self.store
            .put(comment.encode(), PutCondition::Exists)
            .await
            .map_err(|e| match e {
                StoreError::ConditionFailed(_) => {
                    RepoError::NotFound(EntityRef::Comment { blog_id, user_id })
                }
                other => other.into(),
            })?;

        Ok(comment)
    }

    /// Delete a single comment. Comments have no dependents.
    #[instrument(skip(self))]
    pub async fn delete(&self, blog_id: Uuid, user_id: Uuid) -> Result<EntityRef, RepoError> {
        let entity = EntityRef::Comment { blog_id, user_id };
        if !self
            .store
            .delete(&keys::comment_key(blog_id, user_id))
            .await?
        {
            return Err(RepoError::NotFound(entity));
        }
        Ok(entity)
    }

    /// Comments matching every given filter, from one query: the blog's
    /// partition, the author's owner-index partition, or the type index.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: CommentFilter) -> Result<Vec<Comment>, RepoError> {
        let query = match (filter.blog_id, filter.user_id) {
            (Some(blog_id), Some(user_id)) => keys::comments_by_blog(blog_id)
                .filter_eq(attr::USER_ID, user_id.to_string()),
            (Some(blog_id), None) => keys::comments_by_blog(blog_id),
            (None, Some(user_id)) => keys::comments_by_user(user_id),
            (None, None) => keys::all_of(EntityKind::Comment),
        };
        self.store.query_entities(&query).await
    }
}
