use async_trait::async_trait;

use super::error::StoreError;
use super::item::{Item, PrimaryKey, PutCondition, Query};

/// Item storage with a single table and secondary indexes.
///
/// Each call is atomic on its own; there are no multi-item transactions.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Fetch an item by its primary key.
    async fn get(&self, key: &PrimaryKey) -> Result<Option<Item>, StoreError>;

    /// Write an item, subject to `condition`.
    ///
    /// The item must carry string `PK` and `SK` attributes.
    async fn put(&self, item: Item, condition: PutCondition) -> Result<(), StoreError>;

    /// Delete an item by its primary key.
    ///
    /// Returns `true` if the item was deleted, `false` if it did not exist.
    async fn delete(&self, key: &PrimaryKey) -> Result<bool, StoreError>;

    /// Run a key-condition query against the table or a secondary index.
    ///
    /// Results are ordered by the index sort key.
    async fn query(&self, query: &Query) -> Result<Vec<Item>, StoreError>;

    /// Whether an item exists.
    async fn exists(&self, key: &PrimaryKey) -> Result<bool, StoreError> {
        Ok(self.get(key).await?.is_some())
    }
}
