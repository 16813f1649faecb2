use chrono::Utc;
use common::storage::{PutCondition, StoreError};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::cascade::{CascadeCoordinator, CascadeReport};
use crate::codec::{Entity, attr};
use crate::entity::{Blog, EntityKind, EntityRef};
use crate::keys;
use crate::models::blog::{
    BlogFilter, CreateBlogRequest, UpdateBlogRequest, validate_blog, validate_create_blog,
};

use super::{RepoError, Store};

#[derive(Clone)]
pub struct BlogRepository {
    store: Store,
    cascade: CascadeCoordinator,
}

impl BlogRepository {
    pub fn new(store: Store, cascade: CascadeCoordinator) -> Self {
        Self { store, cascade }
    }

    /// Create a blog owned by `payload.user_id`, which must exist.
    #[instrument(skip(self, payload), fields(user_id = %payload.user_id))]
    pub async fn create(&self, payload: CreateBlogRequest) -> Result<Blog, RepoError> {
        validate_create_blog(&payload)?;

        if !self.store.exists(&keys::user_key(payload.user_id)).await? {
            return Err(RepoError::ForeignKey(EntityRef::User {
                id: payload.user_id,
            }));
        }

        let blog = Blog {
            id: Uuid::new_v4(),
            user_id: payload.user_id,
            title: payload.title.trim().to_string(),
            score: payload.score,
            created_date: Utc::now(),
        };

        self.store
            .put(blog.encode(), PutCondition::NotExists)
            .await?;

        info!(blog_id = %blog.id, "Blog created");
        Ok(blog)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Blog, RepoError> {
        self.store
            .fetch(&keys::blog_key(id))
            .await?
            .ok_or(RepoError::NotFound(EntityRef::Blog { id }))
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: UpdateBlogRequest) -> Result<Blog, RepoError> {
        let mut blog = self.get(id).await?;
        if patch == UpdateBlogRequest::default() {
            return Ok(blog);
        }

        if let Some(title) = patch.title {
            blog.title = title.trim().to_string();
        }
        if let Some(score) = patch.score {
            blog.score = score;
        }
        validate_blog(&blog)?;

        self.store
            .put(blog.encode(), PutCondition::Exists)
            .await
            .map_err(|e| match e {
                StoreError::ConditionFailed(_) => RepoError::NotFound(EntityRef::Blog { id }),
                other => other.into(),
            })?;

        Ok(blog)
    }

    /// Delete a blog and every comment on it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<CascadeReport, RepoError> {
        self.get(id).await?;
        Ok(self.cascade.delete_blog(id).await?)
    }

    /// Blogs matching every given filter. Filtering by owner reads the owner
    /// index; otherwise the type index. Either way, one query.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: BlogFilter) -> Result<Vec<Blog>, RepoError> {
        let mut query = match filter.user_id {
            Some(user_id) => keys::blogs_by_user(user_id),
            None => keys::all_of(EntityKind::Blog),
        };
        if let Some(title) = filter.title {
            query = query.filter_eq(attr::TITLE, title);
        }
        self.store.query_entities(&query).await
    }
}
