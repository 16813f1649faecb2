//! Loading seed data into an empty or partially filled store.

use std::path::Path;

use common::storage::{EntityStore, Item, PutCondition, StoreError};
use thiserror::Error;
use tracing::{info, warn};

use crate::codec::{AnyEntity, DecodeError, Entity};
use crate::entity::Blog;
use crate::keys;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("seed file is not a JSON item array: {0}")]
    Parse(#[from] serde_json::Error),
    /// Entry `index` of the seed array is not a valid entity.
    #[error("seed item {index} is invalid: {source}")]
    Invalid { index: usize, source: DecodeError },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of a seed run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    /// Already present under the same key.
    pub existing: usize,
    /// Referenced a user or blog that is not in the store.
    pub orphaned: usize,
}

/// Read a JSON item array from `path` and insert it with [`seed_items`].
pub async fn seed_from_file(
    store: &dyn EntityStore,
    path: &Path,
) -> Result<SeedSummary, SeedError> {
    let bytes = tokio::fs::read(path).await?;
    let items: Vec<Item> = serde_json::from_slice(&bytes)?;
    let summary = seed_items(store, items).await?;
    info!(
        path = %path.display(),
        inserted = summary.inserted,
        existing = summary.existing,
        orphaned = summary.orphaned,
        "Seed data loaded"
    );
    Ok(summary)
}

/// Insert entities that are not already stored.
///
/// Every item is decoded before anything is written, so a malformed entry
/// aborts the run without side effects. Items are re-encoded, so index
/// attributes are rebuilt and need not be present in the input. Users go in
/// first, then blogs, then comments; entities whose parent is missing are
/// skipped.
pub async fn seed_items(
    store: &dyn EntityStore,
    items: Vec<Item>,
) -> Result<SeedSummary, SeedError> {
    let mut entities = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            AnyEntity::decode(item).map_err(|source| SeedError::Invalid { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;
    entities.sort_by_key(|entity| match entity {
        AnyEntity::User(_) => 0,
        AnyEntity::Blog(_) => 1,
        AnyEntity::Comment(_) => 2,
    });

    let mut summary = SeedSummary::default();
    for entity in entities {
        if !parents_exist(store, &entity).await? {
            warn!(entity = %entity.entity_ref(), "Skipping seed item with missing parent");
            summary.orphaned += 1;
            continue;
        }
        match store.put(entity.encode(), PutCondition::NotExists).await {
            Ok(()) => summary.inserted += 1,
            Err(StoreError::ConditionFailed(_)) => summary.existing += 1,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(summary)
}

async fn parents_exist(store: &dyn EntityStore, entity: &AnyEntity) -> Result<bool, StoreError> {
    match entity {
        AnyEntity::User(_) => Ok(true),
        AnyEntity::Blog(Blog { user_id, .. }) => store.exists(&keys::user_key(*user_id)).await,
        AnyEntity::Comment(comment) => {
            let user = store.exists(&keys::user_key(comment.user_id)).await?;
            Ok(user && store.exists(&keys::blog_key(comment.blog_id)).await?)
        }
    }
}
