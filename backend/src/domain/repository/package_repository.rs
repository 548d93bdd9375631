//! Package persistence bound to the open transaction.

use chrono::NaiveDate;
use pagination::{Page, PageRequest};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ids::{PackageId, TruckId};
use crate::domain::package::Package;
use crate::domain::ports::{EntityKind, RecordId, StoreError, StoreTransaction};

/// Persisted package record shape.
///
/// Weight round-trips as exact decimal text and the shipping date as
/// calendar-date text; both come from the types' serde representations.
#[derive(Debug, Serialize, Deserialize)]
struct PackageRecord {
    shipping_type: String,
    weight: Decimal,
    shipping_date: NaiveDate,
    carrier: Option<TruckId>,
}

impl PackageRecord {
    fn from_entity(package: &Package) -> Self {
        Self {
            shipping_type: package.shipping_type().to_owned(),
            weight: package.weight(),
            shipping_date: package.shipping_date(),
            carrier: package.carrier_id(),
        }
    }

    fn into_entity(self, id: PackageId) -> Package {
        Package::restore(
            id,
            self.shipping_type,
            self.weight,
            self.shipping_date,
            self.carrier,
        )
    }
}

fn decode(id: RecordId, value: Value) -> Result<Package, StoreError> {
    let record: PackageRecord =
        serde_json::from_value(value).map_err(|err| StoreError::serialization(err.to_string()))?;
    Ok(record.into_entity(PackageId::from(id)))
}

/// Transaction-scoped repository for packages.
pub struct PackageRepository<'tx> {
    tx: &'tx mut dyn StoreTransaction,
}

impl<'tx> PackageRepository<'tx> {
    pub(crate) fn new(tx: &'tx mut dyn StoreTransaction) -> Self {
        Self { tx }
    }

    /// Stage the package for persistence and report its identity.
    pub async fn add(&mut self, package: &Package) -> Result<PackageId, StoreError> {
        let record = serde_json::to_value(PackageRecord::from_entity(package))
            .map_err(|err| StoreError::serialization(err.to_string()))?;
        match package.id() {
            Some(id) => {
                self.tx.upsert(EntityKind::Packages, id.record(), record)?;
                Ok(id)
            }
            None => {
                let record_id = self.tx.insert(EntityKind::Packages, record).await?;
                Ok(PackageId::from(record_id))
            }
        }
    }

    /// Point lookup; absence is a value, not an error.
    pub async fn get(&self, id: PackageId) -> Result<Option<Package>, StoreError> {
        let Some(value) = self.tx.fetch(EntityKind::Packages, id.record()).await? else {
            return Ok(None);
        };
        decode(id.record(), value).map(Some)
    }

    /// Paged read in stable store order.
    pub async fn get_list(&self, page: PageRequest) -> Result<Page<Package>, StoreError> {
        let raw = self
            .tx
            .fetch_page(EntityKind::Packages, page.limit(), page.offset())
            .await?;
        let mut packages = Vec::with_capacity(raw.records.len());
        for (id, value) in raw.records {
            packages.push(decode(id, value)?);
        }
        Ok(Page::new(packages, raw.has_more))
    }

    /// Indexed query for every package carried by the given truck.
    pub async fn get_by_carrier(&self, truck_id: TruckId) -> Result<Vec<Package>, StoreError> {
        let needle = Value::from(truck_id.value());
        let records = self
            .tx
            .find_eq(EntityKind::Packages, "carrier", &needle)
            .await?;
        records
            .into_iter()
            .map(|(id, value)| decode(id, value))
            .collect()
    }

    /// Stage a delete when the record exists.
    ///
    /// Returns the deleted id, or `None` when there was nothing to delete.
    pub async fn remove(&mut self, id: PackageId) -> Result<Option<PackageId>, StoreError> {
        if self
            .tx
            .fetch(EntityKind::Packages, id.record())
            .await?
            .is_none()
        {
            return Ok(None);
        }
        self.tx.delete(EntityKind::Packages, id.record())?;
        Ok(Some(id))
    }
}
