//! In-memory [`TableStore`] backend.
//!
//! Stores items in a `BTreeMap` keyed by the `(PK, SK)` pair, so base-table
//! queries get real sort-key ordering. Secondary-index queries are emulated
//! by filtering on the index key attributes and sorting by the index sort
//! key. Transactions validate every condition before applying anything, so
//! a failed transaction leaves the map untouched.
//!
//! This backend serves local development and the repository test suite; it
//! can also be told to start failing transactions after a given number of
//! successes to exercise partial-failure handling.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::codec;
use super::error::{Result, StoreError};
use super::item::{self, StoredItem};
use super::keys;
use super::store::{ScanOrder, SecondaryIndex, TableStore, WriteOp, MAX_TRANSACT_OPS};

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    items: BTreeMap<(String, String), StoredItem>,
    allowed_transacts: Option<u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: allow `count` more transactions to succeed, then fail
    /// every later one with [`StoreError::Unavailable`].
    pub async fn fail_after_transacts(&self, count: u32) {
        self.inner.write().await.allowed_transacts = Some(count);
    }

    /// Number of items currently stored, across all partitions.
    pub async fn len(&self) -> usize {
        self.inner.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.items.is_empty()
    }
}

fn item_key(item: &StoredItem) -> Result<(String, String)> {
    let pk = item::get_string(item, keys::ATTR_PK)?;
    let sk = item::get_string(item, keys::ATTR_SK)?;
    Ok((pk, sk))
}

fn not_found(entity_type: &'static str, id: &str) -> StoreError {
    StoreError::NotFound {
        entity_type,
        id: id.to_string(),
    }
}

impl Inner {
    fn check(&self, op: &WriteOp) -> Result<()> {
        match op {
            WriteOp::PutNew { item } => {
                let key = item_key(item)?;
                if self.items.contains_key(&key) {
                    let (entity_type, id) = codec::item_identity(item);
                    return Err(StoreError::AlreadyExists {
                        entity_type,
                        id,
                    });
                }
                Ok(())
            }
            WriteOp::Put { item } => item_key(item).map(|_| ()),
            WriteOp::Delete { .. } => Ok(()),
            WriteOp::DeleteExisting {
                pk,
                sk,
                entity_type,
                id,
            } => {
                if !self.items.contains_key(&(pk.clone(), sk.clone())) {
                    return Err(not_found(entity_type, id));
                }
                Ok(())
            }
            WriteOp::Add {
                pk,
                sk,
                entity_type,
                id,
                ..
            } => {
                if !self.items.contains_key(&(pk.clone(), sk.clone())) {
                    return Err(not_found(entity_type, id));
                }
                Ok(())
            }
        }
    }

    fn apply(&mut self, op: WriteOp) {
        match op {
            WriteOp::PutNew { item } | WriteOp::Put { item } => {
                if let Ok(key) = item_key(&item) {
                    self.items.insert(key, item);
                }
            }
            WriteOp::Delete { pk, sk } | WriteOp::DeleteExisting { pk, sk, .. } => {
                self.items.remove(&(pk, sk));
            }
            WriteOp::Add {
                pk,
                sk,
                attribute,
                delta,
                ..
            } => {
                if let Some(item) = self.items.get_mut(&(pk, sk)) {
                    add_to_attribute(item, attribute, delta);
                }
            }
        }
    }
}

fn add_to_attribute(item: &mut StoredItem, attribute: &str, delta: i64) {
    let current = item.get(attribute).and_then(Value::as_i64).unwrap_or(0);
    item.insert(attribute.to_string(), Value::from(current + delta));
}

fn op_key(op: &WriteOp) -> Result<(String, String)> {
    match op {
        WriteOp::PutNew { item } | WriteOp::Put { item } => item_key(item),
        WriteOp::Delete { pk, sk }
        | WriteOp::DeleteExisting { pk, sk, .. }
        | WriteOp::Add { pk, sk, .. } => Ok((pk.clone(), sk.clone())),
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn get(&self, pk: &str, sk: &str) -> Result<Option<StoredItem>> {
        let inner = self.inner.read().await;
        Ok(inner
            .items
            .get(&(pk.to_string(), sk.to_string()))
            .cloned())
    }

    async fn put_new(&self, item: StoredItem) -> Result<()> {
        let mut inner = self.inner.write().await;
        let key = item_key(&item)?;
        if inner.items.contains_key(&key) {
            let (entity_type, id) = codec::item_identity(&item);
            return Err(StoreError::AlreadyExists { entity_type, id });
        }
        inner.items.insert(key, item);
        Ok(())
    }

    async fn put_existing(&self, item: StoredItem) -> Result<()> {
        let mut inner = self.inner.write().await;
        let key = item_key(&item)?;
        if !inner.items.contains_key(&key) {
            let (entity_type, id) = codec::item_identity(&item);
            return Err(StoreError::NotFound { entity_type, id });
        }
        inner.items.insert(key, item);
        Ok(())
    }

    async fn delete_existing(
        &self,
        pk: &str,
        sk: &str,
        entity_type: &'static str,
        id: &str,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner
            .items
            .remove(&(pk.to_string(), sk.to_string()))
            .is_none()
        {
            return Err(not_found(entity_type, id));
        }
        Ok(())
    }

    async fn query(&self, pk: &str, sk_prefix: &str, order: ScanOrder) -> Result<Vec<StoredItem>> {
        let inner = self.inner.read().await;
        let mut items: Vec<StoredItem> = inner
            .items
            .range((pk.to_string(), sk_prefix.to_string())..)
            .take_while(|((item_pk, item_sk), _)| item_pk == pk && item_sk.starts_with(sk_prefix))
            .map(|(_, item)| item.clone())
            .collect();
        if order == ScanOrder::Descending {
            items.reverse();
        }
        Ok(items)
    }

    async fn query_index(
        &self,
        index: SecondaryIndex,
        pk: &str,
        order: ScanOrder,
    ) -> Result<Vec<StoredItem>> {
        let (pk_attr, sk_attr) = match index {
            SecondaryIndex::One => (keys::ATTR_GSI1_PK, keys::ATTR_GSI1_SK),
            SecondaryIndex::Two => (keys::ATTR_GSI2_PK, keys::ATTR_GSI2_SK),
        };
        let inner = self.inner.read().await;
        let mut matches: Vec<(String, String, StoredItem)> = inner
            .items
            .iter()
            .filter(|(_, item)| {
                item.get(pk_attr).and_then(Value::as_str) == Some(pk)
            })
            .map(|((_, base_sk), item)| {
                let index_sk = item
                    .get(sk_attr)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                (index_sk, base_sk.clone(), item.clone())
            })
            .collect();
        matches.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
        if order == ScanOrder::Descending {
            matches.reverse();
        }
        Ok(matches.into_iter().map(|(_, _, item)| item).collect())
    }

    async fn transact(&self, ops: Vec<WriteOp>) -> Result<()> {
        if ops.len() > MAX_TRANSACT_OPS {
            return Err(StoreError::ValidationFailed(format!(
                "transaction of {} operations exceeds the limit of {}",
                ops.len(),
                MAX_TRANSACT_OPS
            )));
        }

        let mut inner = self.inner.write().await;
        if let Some(remaining) = inner.allowed_transacts.as_mut() {
            if *remaining == 0 {
                return Err(StoreError::Unavailable(
                    "injected transaction failure".to_string(),
                ));
            }
            *remaining -= 1;
        }

        let mut seen = HashSet::new();
        for op in &ops {
            let key = op_key(op)?;
            if !seen.insert(key) {
                return Err(StoreError::ValidationFailed(
                    "transaction touches the same key twice".to_string(),
                ));
            }
            inner.check(op)?;
        }
        for op in ops {
            inner.apply(op);
        }
        Ok(())
    }

    async fn add(
        &self,
        pk: &str,
        sk: &str,
        attribute: &str,
        delta: i64,
        entity_type: &'static str,
        id: &str,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        match inner.items.get_mut(&(pk.to_string(), sk.to_string())) {
            Some(item) => {
                add_to_attribute(item, attribute, delta);
                Ok(())
            }
            None => Err(not_found(entity_type, id)),
        }
    }

    async fn next_in_sequence(&self, name: &str) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let key = (keys::sequence_pk().to_string(), name.to_string());
        let entry = inner.items.entry(key.clone()).or_insert_with(|| {
            let mut item = StoredItem::new();
            item.insert(keys::ATTR_PK.to_string(), Value::String(key.0.clone()));
            item.insert(keys::ATTR_SK.to_string(), Value::String(key.1.clone()));
            item
        });
        let next = entry.get("value").and_then(Value::as_u64).unwrap_or(0) + 1;
        entry.insert("value".to_string(), Value::from(next));
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project_item(sk: &str, id: &str) -> StoredItem {
        let mut item = StoredItem::new();
        item.insert("PK".to_string(), json!("PROJECT"));
        item.insert("SK".to_string(), json!(sk));
        item.insert("entityType".to_string(), json!("PROJECT"));
        item.insert("projectId".to_string(), json!(id));
        item
    }

    #[tokio::test]
    async fn test_put_new_rejects_duplicate_key() {
        let store = MemoryStore::new();
        let item = project_item("PROJECT#2024#a", "a");
        store.put_new(item.clone()).await.unwrap();

        assert_eq!(
            store.put_new(item).await,
            Err(StoreError::AlreadyExists {
                entity_type: "Project",
                id: "a".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_put_existing_requires_presence() {
        let store = MemoryStore::new();
        let item = project_item("PROJECT#2024#a", "a");
        assert!(matches!(
            store.put_existing(item.clone()).await,
            Err(StoreError::NotFound { .. })
        ));

        store.put_new(item.clone()).await.unwrap();
        store.put_existing(item).await.unwrap();
    }

    #[tokio::test]
    async fn test_query_respects_prefix_and_order() {
        let store = MemoryStore::new();
        for sk in ["IMAGE#001#x", "IMAGE#002#y", "META#other"] {
            let mut item = project_item(sk, sk);
            item.insert("PK".to_string(), json!("PROJECT#p"));
            store.put_new(item).await.unwrap();
        }

        let ascending = store
            .query("PROJECT#p", "IMAGE#", ScanOrder::Ascending)
            .await
            .unwrap();
        let sks: Vec<&str> = ascending
            .iter()
            .map(|i| i["SK"].as_str().unwrap())
            .collect();
        assert_eq!(sks, vec!["IMAGE#001#x", "IMAGE#002#y"]);

        let descending = store
            .query("PROJECT#p", "IMAGE#", ScanOrder::Descending)
            .await
            .unwrap();
        assert_eq!(descending[0]["SK"], json!("IMAGE#002#y"));
    }

    #[tokio::test]
    async fn test_query_index_sorts_by_index_sort_key() {
        let store = MemoryStore::new();
        for (sk, gsi1sk) in [("PROJECT#a#one", "2024-02"), ("PROJECT#b#two", "2024-01")] {
            let mut item = project_item(sk, sk);
            item.insert("GSI1PK".to_string(), json!("PROJECT#STATUS#published"));
            item.insert("GSI1SK".to_string(), json!(gsi1sk));
            store.put_new(item).await.unwrap();
        }

        let newest_first = store
            .query_index(
                SecondaryIndex::One,
                "PROJECT#STATUS#published",
                ScanOrder::Descending,
            )
            .await
            .unwrap();
        assert_eq!(newest_first[0]["GSI1SK"], json!("2024-02"));
        assert_eq!(newest_first[1]["GSI1SK"], json!("2024-01"));

        let none = store
            .query_index(
                SecondaryIndex::Two,
                "PROJECT#STATUS#published",
                ScanOrder::Ascending,
            )
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_transact_applies_nothing_on_failure() {
        let store = MemoryStore::new();
        let result = store
            .transact(vec![
                WriteOp::Put {
                    item: project_item("PROJECT#2024#a", "a"),
                },
                WriteOp::DeleteExisting {
                    pk: "PROJECT".to_string(),
                    sk: "PROJECT#2024#missing".to_string(),
                    entity_type: "Project",
                    id: "missing".to_string(),
                },
            ])
            .await;

        assert_eq!(result, Err(not_found("Project", "missing")));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_transact_rejects_duplicate_keys() {
        let store = MemoryStore::new();
        let result = store
            .transact(vec![
                WriteOp::Put {
                    item: project_item("PROJECT#2024#a", "a"),
                },
                WriteOp::Delete {
                    pk: "PROJECT".to_string(),
                    sk: "PROJECT#2024#a".to_string(),
                },
            ])
            .await;
        assert!(matches!(result, Err(StoreError::ValidationFailed(_))));
    }

    #[tokio::test]
    async fn test_add_increments_in_place() {
        let store = MemoryStore::new();
        let mut item = project_item("PROJECT#2024#a", "a");
        item.insert("viewCount".to_string(), json!(5));
        store.put_new(item).await.unwrap();

        store
            .add("PROJECT", "PROJECT#2024#a", "viewCount", 3, "Project", "a")
            .await
            .unwrap();
        let stored = store.get("PROJECT", "PROJECT#2024#a").await.unwrap().unwrap();
        assert_eq!(stored["viewCount"], json!(8));

        assert_eq!(
            store
                .add("PROJECT", "PROJECT#gone", "viewCount", 1, "Project", "gone")
                .await,
            Err(not_found("Project", "gone"))
        );
    }

    #[tokio::test]
    async fn test_sequences_are_independent() {
        let store = MemoryStore::new();
        assert_eq!(store.next_in_sequence("SEQ#a").await.unwrap(), 1);
        assert_eq!(store.next_in_sequence("SEQ#a").await.unwrap(), 2);
        assert_eq!(store.next_in_sequence("SEQ#b").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_fail_after_transacts() {
        let store = MemoryStore::new();
        store.fail_after_transacts(1).await;

        store
            .transact(vec![WriteOp::Put {
                item: project_item("PROJECT#2024#a", "a"),
            }])
            .await
            .unwrap();

        let result = store
            .transact(vec![WriteOp::Put {
                item: project_item("PROJECT#2024#b", "b"),
            }])
            .await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.len().await, 1);
    }
}
