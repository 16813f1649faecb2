mod blog;
mod comment;
mod error;
mod user;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use common::StoreConfig;
use common::storage::{EntityStore, Item, PrimaryKey, PutCondition, Query, StoreError};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::cascade::CascadeCoordinator;
use crate::codec::Entity;

pub use blog::BlogRepository;
pub use comment::CommentRepository;
pub use error::RepoError;
pub use user::UserRepository;

/// Handle to the item store shared by every repository.
///
/// Each call is bounded by the configured request timeout; a call that runs
/// past it is dropped and reported as [`StoreError::Unavailable`].
#[derive(Clone)]
pub struct Store {
    inner: Arc<dyn EntityStore>,
    timeout: Duration,
}

impl Store {
    pub fn new(inner: Arc<dyn EntityStore>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(op, timeout_ms = self.timeout.as_millis() as u64, "Store call timed out");
                Err(StoreError::Unavailable(format!(
                    "{op} timed out after {}ms",
                    self.timeout.as_millis()
                )))
            }
        }
    }

    pub async fn get(&self, key: &PrimaryKey) -> Result<Option<Item>, StoreError> {
        self.bounded("get", self.inner.get(key)).await
    }

    pub async fn exists(&self, key: &PrimaryKey) -> Result<bool, StoreError> {
        self.bounded("exists", self.inner.exists(key)).await
    }

    pub async fn put(&self, item: Item, condition: PutCondition) -> Result<(), StoreError> {
        self.bounded("put", self.inner.put(item, condition)).await
    }

    pub async fn delete(&self, key: &PrimaryKey) -> Result<bool, StoreError> {
        self.bounded("delete", self.inner.delete(key)).await
    }

    pub async fn query(&self, query: &Query) -> Result<Vec<Item>, StoreError> {
        self.bounded("query", self.inner.query(query)).await
    }

    /// Fetch and decode a single entity.
    pub async fn fetch<E: Entity>(&self, key: &PrimaryKey) -> Result<Option<E>, RepoError> {
        match self.get(key).await? {
            Some(item) => Ok(Some(E::decode(&item)?)),
            None => Ok(None),
        }
    }

    /// Run one query and decode every returned item.
    pub async fn query_entities<E: Entity>(&self, query: &Query) -> Result<Vec<E>, RepoError> {
        self.query(query)
            .await?
            .iter()
            .map(|item| E::decode(item).map_err(RepoError::from))
            .collect()
    }
}

/// The per-entity repositories, built once over a single store handle.
#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub blogs: BlogRepository,
    pub comments: CommentRepository,
}

impl Repositories {
    /// `shutdown` is observed by cascading deletes between steps.
    pub fn new(
        store: Arc<dyn EntityStore>,
        config: &StoreConfig,
        shutdown: CancellationToken,
    ) -> Self {
        let store = Store::new(store, config.request_timeout());
        let cascade = CascadeCoordinator::new(store.clone(), shutdown);
        Self {
            users: UserRepository::new(store.clone(), cascade.clone()),
            blogs: BlogRepository::new(store.clone(), cascade),
            comments: CommentRepository::new(store),
        }
    }
}
