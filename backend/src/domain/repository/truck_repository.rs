//! Truck persistence bound to the open transaction.

use std::collections::BTreeSet;

use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ids::{AuthId, PackageId, TruckId};
use crate::domain::ports::{EntityKind, RecordId, StoreError, StoreTransaction};
use crate::domain::truck::Truck;

/// Persisted truck record shape.
#[derive(Debug, Serialize, Deserialize)]
struct TruckRecord {
    #[serde(rename = "type")]
    truck_type: String,
    length: u32,
    axles: u32,
    owner: AuthId,
    packages: Vec<PackageId>,
}

impl TruckRecord {
    fn from_entity(truck: &Truck) -> Self {
        Self {
            truck_type: truck.truck_type().to_owned(),
            length: truck.truck_length(),
            axles: truck.axles(),
            owner: truck.owner().clone(),
            packages: truck.package_ids().iter().copied().collect(),
        }
    }

    fn into_entity(self, id: TruckId) -> Truck {
        let package_ids: BTreeSet<PackageId> = self.packages.into_iter().collect();
        Truck::restore(
            id,
            self.truck_type,
            self.length,
            self.axles,
            self.owner,
            package_ids,
        )
    }
}

fn decode(id: RecordId, value: Value) -> Result<Truck, StoreError> {
    let record: TruckRecord =
        serde_json::from_value(value).map_err(|err| StoreError::serialization(err.to_string()))?;
    Ok(record.into_entity(TruckId::from(id)))
}

/// Transaction-scoped repository for trucks.
pub struct TruckRepository<'tx> {
    tx: &'tx mut dyn StoreTransaction,
}

impl<'tx> TruckRepository<'tx> {
    pub(crate) fn new(tx: &'tx mut dyn StoreTransaction) -> Self {
        Self { tx }
    }

    /// Stage the truck for persistence and report its identity.
    ///
    /// A truck that already carries an identity is upserted in place; an
    /// unsaved truck receives a fresh store-assigned id, returned so the
    /// caller learns it before commit.
    pub async fn add(&mut self, truck: &Truck) -> Result<TruckId, StoreError> {
        let record = serde_json::to_value(TruckRecord::from_entity(truck))
            .map_err(|err| StoreError::serialization(err.to_string()))?;
        match truck.id() {
            Some(id) => {
                self.tx.upsert(EntityKind::Trucks, id.record(), record)?;
                Ok(id)
            }
            None => {
                let record_id = self.tx.insert(EntityKind::Trucks, record).await?;
                Ok(TruckId::from(record_id))
            }
        }
    }

    /// Point lookup; absence is a value, not an error.
    pub async fn get(&self, id: TruckId) -> Result<Option<Truck>, StoreError> {
        let Some(value) = self.tx.fetch(EntityKind::Trucks, id.record()).await? else {
            return Ok(None);
        };
        decode(id.record(), value).map(Some)
    }

    /// Paged read in stable store order.
    pub async fn get_list(&self, page: PageRequest) -> Result<Page<Truck>, StoreError> {
        let raw = self
            .tx
            .fetch_page(EntityKind::Trucks, page.limit(), page.offset())
            .await?;
        let mut trucks = Vec::with_capacity(raw.records.len());
        for (id, value) in raw.records {
            trucks.push(decode(id, value)?);
        }
        Ok(Page::new(trucks, raw.has_more))
    }

    /// Indexed query for every truck registered by the given subject.
    ///
    /// This is how the inverse of the ownership edge is derived; owned-truck
    /// sets are never stored.
    pub async fn get_by_owner(&self, owner: &AuthId) -> Result<Vec<Truck>, StoreError> {
        let needle = Value::String(owner.as_str().to_owned());
        let records = self
            .tx
            .find_eq(EntityKind::Trucks, "owner", &needle)
            .await?;
        records
            .into_iter()
            .map(|(id, value)| decode(id, value))
            .collect()
    }

    /// Stage a delete when the record exists.
    ///
    /// Returns the deleted id, or `None` when there was nothing to delete;
    /// callers use the distinction instead of an error.
    pub async fn remove(&mut self, id: TruckId) -> Result<Option<TruckId>, StoreError> {
        if self.tx.fetch(EntityKind::Trucks, id.record()).await?.is_none() {
            return Ok(None);
        }
        self.tx.delete(EntityKind::Trucks, id.record())?;
        Ok(Some(id))
    }
}
