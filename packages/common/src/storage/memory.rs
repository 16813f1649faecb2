use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;

use super::error::StoreError;
use super::item::{Index, Item, PrimaryKey, PutCondition, Query};
use super::traits::EntityStore;

/// `(index partition key, index sort key, item primary key)`
type IndexEntry = (String, String, PrimaryKey);

#[derive(Default)]
struct Tables {
    items: BTreeMap<PrimaryKey, Item>,
    gsi1: BTreeSet<IndexEntry>,
    gsi2: BTreeSet<IndexEntry>,
}

impl Tables {
    fn secondary(&self, index: Index) -> Option<&BTreeSet<IndexEntry>> {
        match index {
            Index::Primary => None,
            Index::Gsi1 => Some(&self.gsi1),
            Index::Gsi2 => Some(&self.gsi2),
        }
    }

    fn secondary_mut(&mut self, index: Index) -> Option<&mut BTreeSet<IndexEntry>> {
        match index {
            Index::Primary => None,
            Index::Gsi1 => Some(&mut self.gsi1),
            Index::Gsi2 => Some(&mut self.gsi2),
        }
    }

    /// Index projection of an item. Items without both index key attributes are
    /// left out of that index.
    fn index_entry(index: Index, key: &PrimaryKey, item: &Item) -> Option<IndexEntry> {
        let (pk_attr, sk_attr) = index.key_attributes();
        let pk = item.get(pk_attr)?.as_s()?;
        let sk = item.get(sk_attr)?.as_s()?;
        Some((pk.to_string(), sk.to_string(), key.clone()))
    }

    fn insert(&mut self, key: PrimaryKey, item: Item) {
        self.remove(&key);
        for index in Index::secondary() {
            if let Some(entry) = Self::index_entry(index, &key, &item)
                && let Some(set) = self.secondary_mut(index)
            {
                set.insert(entry);
            }
        }
        self.items.insert(key, item);
    }

    fn remove(&mut self, key: &PrimaryKey) -> bool {
        let Some(old) = self.items.remove(key) else {
            return false;
        };
        for index in Index::secondary() {
            if let Some(entry) = Self::index_entry(index, key, &old)
                && let Some(set) = self.secondary_mut(index)
            {
                set.remove(&entry);
            }
        }
        true
    }

    fn query(&self, query: &Query) -> Vec<Item> {
        let prefix = query.sort_prefix.as_deref().unwrap_or("");

        match self.secondary(query.index) {
            None => {
                let start = PrimaryKey::new(query.partition.as_str(), prefix);
                self.items
                    .range(start..)
                    .take_while(|(key, _)| key.pk == query.partition && key.sk.starts_with(prefix))
                    .map(|(_, item)| item)
                    .filter(|item| query.matches(item))
                    .cloned()
                    .collect()
            }
            Some(set) => {
                let start = (
                    query.partition.clone(),
                    prefix.to_string(),
                    PrimaryKey::new("", ""),
                );
                set.range(start..)
                    .take_while(|(pk, sk, _)| *pk == query.partition && sk.starts_with(prefix))
                    .filter_map(|(_, _, key)| self.items.get(key))
                    .filter(|item| query.matches(item))
                    .cloned()
                    .collect()
            }
        }
    }
}

/// In-process item store with a primary table and two sparse secondary
/// indexes.
///
/// Every operation takes the lock once, so single-item reads and writes are
/// atomic with respect to each other.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding `items`, later items overwriting earlier ones.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Result<Self, StoreError> {
        let mut tables = Tables::default();
        for item in items {
            let key = item_key(&item)?;
            tables.insert(key, item);
        }
        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    /// Number of items in the table.
    pub async fn len(&self) -> usize {
        self.tables.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Copy of every item, ordered by primary key.
    pub async fn export(&self) -> Vec<Item> {
        self.tables.read().await.items.values().cloned().collect()
    }

    /// Load a store from a JSON snapshot written by [`MemoryStore::save_snapshot`].
    pub async fn load_snapshot(path: &Path) -> Result<Self, StoreError> {
        let data = fs::read(path).await?;
        let items: Vec<Item> = serde_json::from_slice(&data)?;
        Self::from_items(items)
    }

    /// Write every item to `path` as a JSON array.
    ///
    /// The snapshot is written to a sibling temp file first and renamed into
    /// place, so a crash never leaves a truncated snapshot behind.
    pub async fn save_snapshot(&self, path: &Path) -> Result<usize, StoreError> {
        let items = self.export().await;
        let data = serde_json::to_vec_pretty(&items)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = path.with_extension("tmp");
        if let Err(e) = fs::write(&temp_path, &data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(items.len())
    }
}

fn item_key(item: &Item) -> Result<PrimaryKey, StoreError> {
    PrimaryKey::of(item)
        .ok_or_else(|| StoreError::InvalidItem("item must have string PK and SK attributes".into()))
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn get(&self, key: &PrimaryKey) -> Result<Option<Item>, StoreError> {
        Ok(self.tables.read().await.items.get(key).cloned())
    }

    async fn put(&self, item: Item, condition: PutCondition) -> Result<(), StoreError> {
        let key = item_key(&item)?;
        let mut tables = self.tables.write().await;

        let exists = tables.items.contains_key(&key);
        match condition {
            PutCondition::NotExists if exists => return Err(StoreError::ConditionFailed(key)),
            PutCondition::Exists if !exists => return Err(StoreError::ConditionFailed(key)),
            _ => {}
        }

        tables.insert(key, item);
        Ok(())
    }

    async fn delete(&self, key: &PrimaryKey) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.remove(key))
    }

    async fn query(&self, query: &Query) -> Result<Vec<Item>, StoreError> {
        let items = self.tables.read().await.query(query);
        tracing::debug!(
            index = %query.index,
            partition = %query.partition,
            returned = items.len(),
            "query"
        );
        Ok(items)
    }
}
