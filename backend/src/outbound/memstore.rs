//! In-process implementation of the transactional store port.
//!
//! Records live on per-kind shelves ordered by id, which makes pagination
//! deterministic. Each transaction buffers its mutations and applies them
//! under the single writer lock at commit; reads always go to the committed
//! shelves, so a transaction never observes its own staged writes. Id
//! sequences advance at staging time and are never rewound, so identifiers
//! are unique even across rolled-back transactions.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{
    EntityKind, RecordId, RecordPage, StoreError, StoreTransaction, TransactionalStore,
};

#[derive(Debug, Default)]
struct Shelves {
    records: HashMap<EntityKind, BTreeMap<i64, Value>>,
    sequences: HashMap<EntityKind, i64>,
}

/// Shared in-process store.
///
/// Cloning is cheap; clones share the same shelves.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    shelves: Arc<RwLock<Shelves>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionalStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError> {
        Ok(Box::new(MemoryTransaction {
            shelves: Arc::clone(&self.shelves),
            staged: Vec::new(),
            finished: false,
        }))
    }
}

#[derive(Debug)]
enum Mutation {
    Upsert {
        kind: EntityKind,
        id: i64,
        record: Value,
    },
    Delete {
        kind: EntityKind,
        id: i64,
    },
}

/// One open transaction against a [`MemoryStore`].
pub struct MemoryTransaction {
    shelves: Arc<RwLock<Shelves>>,
    staged: Vec<Mutation>,
    finished: bool,
}

impl MemoryTransaction {
    const fn ensure_active(&self) -> Result<(), StoreError> {
        if self.finished {
            return Err(StoreError::TransactionFinished);
        }
        Ok(())
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn insert(&mut self, kind: EntityKind, record: Value) -> Result<RecordId, StoreError> {
        self.ensure_active()?;
        let id = {
            let mut shelves = self.shelves.write().await;
            let sequence = shelves.sequences.entry(kind).or_insert(0);
            *sequence += 1;
            *sequence
        };
        self.staged.push(Mutation::Upsert { kind, id, record });
        Ok(RecordId::new(id))
    }

    fn upsert(&mut self, kind: EntityKind, id: RecordId, record: Value) -> Result<(), StoreError> {
        self.ensure_active()?;
        self.staged.push(Mutation::Upsert {
            kind,
            id: id.value(),
            record,
        });
        Ok(())
    }

    fn delete(&mut self, kind: EntityKind, id: RecordId) -> Result<(), StoreError> {
        self.ensure_active()?;
        self.staged.push(Mutation::Delete {
            kind,
            id: id.value(),
        });
        Ok(())
    }

    async fn fetch(&self, kind: EntityKind, id: RecordId) -> Result<Option<Value>, StoreError> {
        let shelves = self.shelves.read().await;
        Ok(shelves
            .records
            .get(&kind)
            .and_then(|shelf| shelf.get(&id.value()))
            .cloned())
    }

    async fn fetch_page(
        &self,
        kind: EntityKind,
        limit: u32,
        offset: u32,
    ) -> Result<RecordPage, StoreError> {
        let shelves = self.shelves.read().await;
        let Some(shelf) = shelves.records.get(&kind) else {
            return Ok(RecordPage {
                records: Vec::new(),
                has_more: false,
            });
        };
        let mut cursor = shelf.iter().skip(offset as usize);
        let records: Vec<(RecordId, Value)> = cursor
            .by_ref()
            .take(limit as usize)
            .map(|(id, record)| (RecordId::new(*id), record.clone()))
            .collect();
        // Continuation comes from probing the cursor once past the page,
        // not from counting the remaining rows.
        let has_more = cursor.next().is_some();
        Ok(RecordPage { records, has_more })
    }

    async fn find_eq(
        &self,
        kind: EntityKind,
        field: &str,
        value: &Value,
    ) -> Result<Vec<(RecordId, Value)>, StoreError> {
        let shelves = self.shelves.read().await;
        let Some(shelf) = shelves.records.get(&kind) else {
            return Ok(Vec::new());
        };
        Ok(shelf
            .iter()
            .filter(|(_, record)| record.get(field) == Some(value))
            .map(|(id, record)| (RecordId::new(*id), record.clone()))
            .collect())
    }

    async fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
        self.ensure_active()?;
        self.finished = true;
        let mut shelves = self.shelves.write().await;
        debug!(mutations = self.staged.len(), "committing staged mutations");
        for mutation in self.staged.drain(..) {
            match mutation {
                Mutation::Upsert { kind, id, record } => {
                    shelves.records.entry(kind).or_default().insert(id, record);
                }
                Mutation::Delete { kind, id } => {
                    if let Some(shelf) = shelves.records.get_mut(&kind) {
                        shelf.remove(&id);
                    }
                }
            }
        }
        Ok(())
    }

    fn rollback(&mut self) {
        // Idempotent: only an in-progress transaction has anything to abort.
        if !self.finished {
            self.staged.clear();
            self.finished = true;
        }
    }

    fn is_active(&self) -> bool {
        !self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn begin(store: &MemoryStore) -> Box<dyn StoreTransaction> {
        store.begin().await.expect("transaction opens")
    }

    #[tokio::test]
    async fn staged_writes_are_invisible_until_commit() {
        let store = MemoryStore::new();
        let mut tx = begin(&store).await;
        let id = tx
            .insert(EntityKind::Packages, json!({"shipping_type": "overnight"}))
            .await
            .expect("insert stages");

        let reader = begin(&store).await;
        assert_eq!(
            reader.fetch(EntityKind::Packages, id).await.expect("fetch"),
            None
        );

        tx.commit().await.expect("commit applies");
        let record = reader
            .fetch(EntityKind::Packages, id)
            .await
            .expect("fetch")
            .expect("record visible after commit");
        assert_eq!(record["shipping_type"], "overnight");
    }

    #[tokio::test]
    async fn dropping_an_uncommitted_transaction_discards_writes() {
        let store = MemoryStore::new();
        let id = {
            let mut tx = begin(&store).await;
            tx.insert(EntityKind::Trucks, json!({"type": "Box truck"}))
                .await
                .expect("insert stages")
        };

        let reader = begin(&store).await;
        assert_eq!(
            reader.fetch(EntityKind::Trucks, id).await.expect("fetch"),
            None
        );
    }

    #[tokio::test]
    async fn rollback_is_idempotent_and_deactivates() {
        let store = MemoryStore::new();
        let mut tx = begin(&store).await;
        assert!(tx.is_active());

        tx.rollback();
        tx.rollback();
        assert!(!tx.is_active());
        assert_eq!(
            tx.upsert(EntityKind::Trucks, RecordId::new(1), json!({})),
            Err(StoreError::TransactionFinished)
        );
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_rollback() {
        let store = MemoryStore::new();
        let first = {
            let mut tx = begin(&store).await;
            let id = tx
                .insert(EntityKind::Trucks, json!({"type": "Flatbed"}))
                .await
                .expect("insert stages");
            tx.rollback();
            id
        };

        let mut tx = begin(&store).await;
        let second = tx
            .insert(EntityKind::Trucks, json!({"type": "Flatbed"}))
            .await
            .expect("insert stages");
        assert!(second > first);
    }

    #[tokio::test]
    async fn pages_are_disjoint_and_probe_for_continuation() {
        let store = MemoryStore::new();
        let mut tx = begin(&store).await;
        for n in 0..7 {
            tx.insert(EntityKind::Packages, json!({"n": n}))
                .await
                .expect("insert stages");
        }
        tx.commit().await.expect("commit applies");

        let reader = begin(&store).await;
        let first = reader
            .fetch_page(EntityKind::Packages, 5, 0)
            .await
            .expect("page");
        let second = reader
            .fetch_page(EntityKind::Packages, 5, 5)
            .await
            .expect("page");

        assert_eq!(first.records.len(), 5);
        assert!(first.has_more);
        assert_eq!(second.records.len(), 2);
        assert!(!second.has_more);

        let first_ids: Vec<_> = first.records.iter().map(|(id, _)| *id).collect();
        assert!(second.records.iter().all(|(id, _)| !first_ids.contains(id)));
    }

    #[tokio::test]
    async fn find_eq_matches_on_top_level_fields() {
        let store = MemoryStore::new();
        let mut tx = begin(&store).await;
        tx.insert(EntityKind::Trucks, json!({"owner": "abc123"}))
            .await
            .expect("insert stages");
        tx.insert(EntityKind::Trucks, json!({"owner": "other"}))
            .await
            .expect("insert stages");
        tx.commit().await.expect("commit applies");

        let reader = begin(&store).await;
        let matches = reader
            .find_eq(EntityKind::Trucks, "owner", &json!("abc123"))
            .await
            .expect("query");
        assert_eq!(matches.len(), 1);
    }
}
