//! Truck manager persistence bound to the open transaction.
//!
//! Manager records store only the auth subject; the owned-truck set is
//! derived on read from an indexed query over truck owners, so the two sides
//! of the ownership edge cannot diverge.

use std::collections::BTreeSet;

use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ids::{AuthId, ManagerId, TruckId};
use crate::domain::manager::TruckManager;
use crate::domain::ports::{EntityKind, RecordId, StoreError, StoreTransaction};

/// Persisted manager record shape.
#[derive(Debug, Serialize, Deserialize)]
struct ManagerRecord {
    auth_id: AuthId,
}

/// Transaction-scoped repository for truck managers.
pub struct ManagerRepository<'tx> {
    tx: &'tx mut dyn StoreTransaction,
}

impl<'tx> ManagerRepository<'tx> {
    pub(crate) fn new(tx: &'tx mut dyn StoreTransaction) -> Self {
        Self { tx }
    }

    /// Stage the manager for persistence and report its identity.
    pub async fn add(&mut self, manager: &TruckManager) -> Result<ManagerId, StoreError> {
        let record = serde_json::to_value(ManagerRecord {
            auth_id: manager.auth_id().clone(),
        })
        .map_err(|err| StoreError::serialization(err.to_string()))?;
        match manager.id() {
            Some(id) => {
                self.tx.upsert(EntityKind::Managers, id.record(), record)?;
                Ok(id)
            }
            None => {
                let record_id = self.tx.insert(EntityKind::Managers, record).await?;
                Ok(ManagerId::from(record_id))
            }
        }
    }

    /// Point lookup; absence is a value, not an error.
    pub async fn get(&self, id: ManagerId) -> Result<Option<TruckManager>, StoreError> {
        let Some(value) = self.tx.fetch(EntityKind::Managers, id.record()).await? else {
            return Ok(None);
        };
        self.decode(id.record(), value).await.map(Some)
    }

    /// Paged read in stable store order.
    pub async fn get_list(&self, page: PageRequest) -> Result<Page<TruckManager>, StoreError> {
        let raw = self
            .tx
            .fetch_page(EntityKind::Managers, page.limit(), page.offset())
            .await?;
        let mut managers = Vec::with_capacity(raw.records.len());
        for (id, value) in raw.records {
            managers.push(self.decode(id, value).await?);
        }
        Ok(Page::new(managers, raw.has_more))
    }

    /// Every persisted manager, paging until the store's cursor runs dry.
    pub async fn get_all(&self) -> Result<Vec<TruckManager>, StoreError> {
        let mut managers = Vec::new();
        let mut page = PageRequest::new(pagination::MAX_PAGE_LIMIT, 0);
        loop {
            let (items, has_more) = self.get_list(page).await?.into_parts();
            managers.extend(items);
            if !has_more {
                return Ok(managers);
            }
            page = page.next();
        }
    }

    /// Look up the manager registered for an external subject, if any.
    pub async fn find_by_auth_id(
        &self,
        auth_id: &AuthId,
    ) -> Result<Option<TruckManager>, StoreError> {
        let needle = Value::String(auth_id.as_str().to_owned());
        let mut records = self
            .tx
            .find_eq(EntityKind::Managers, "auth_id", &needle)
            .await?;
        // Re-login must not create duplicates, but the create path does not
        // dedupe either; surface the oldest row when duplicates exist.
        records.sort_by_key(|(id, _)| *id);
        match records.into_iter().next() {
            Some((id, value)) => self.decode(id, value).await.map(Some),
            None => Ok(None),
        }
    }

    /// Stage a delete when the record exists.
    ///
    /// Returns the deleted id, or `None` when there was nothing to delete.
    pub async fn remove(&mut self, id: ManagerId) -> Result<Option<ManagerId>, StoreError> {
        if self
            .tx
            .fetch(EntityKind::Managers, id.record())
            .await?
            .is_none()
        {
            return Ok(None);
        }
        self.tx.delete(EntityKind::Managers, id.record())?;
        Ok(Some(id))
    }

    /// Rebuild the aggregate, recomputing the derived truck set.
    async fn decode(&self, id: RecordId, value: Value) -> Result<TruckManager, StoreError> {
        let record: ManagerRecord = serde_json::from_value(value)
            .map_err(|err| StoreError::serialization(err.to_string()))?;
        let needle = Value::String(record.auth_id.as_str().to_owned());
        let owned = self
            .tx
            .find_eq(EntityKind::Trucks, "owner", &needle)
            .await?;
        let truck_ids: BTreeSet<TruckId> = owned
            .into_iter()
            .map(|(truck_id, _)| TruckId::from(truck_id))
            .collect();
        Ok(TruckManager::restore(
            ManagerId::from(id),
            record.auth_id,
            truck_ids,
        ))
    }
}
