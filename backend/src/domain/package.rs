//! Package aggregate.
//!
//! Weight is an exact decimal (never a float) and the shipping date carries
//! no time-of-day. A package is either unassigned or carried by exactly one
//! truck, referenced by id.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::ids::{PackageId, TruckId};

/// A shippable package.
///
/// ## Invariants
/// - `id` is `None` until the store assigns one on first persist.
/// - `carrier_id`, when set, names the single truck carrying the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    id: Option<PackageId>,
    shipping_type: String,
    weight: Decimal,
    shipping_date: NaiveDate,
    carrier_id: Option<TruckId>,
}

impl Package {
    /// Build an unsaved, unassigned package.
    pub fn new(
        shipping_type: impl Into<String>,
        weight: Decimal,
        shipping_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            shipping_type: shipping_type.into(),
            weight,
            shipping_date,
            carrier_id: None,
        }
    }

    /// Rebuild a persisted package from its stored fields.
    pub fn restore(
        id: PackageId,
        shipping_type: impl Into<String>,
        weight: Decimal,
        shipping_date: NaiveDate,
        carrier_id: Option<TruckId>,
    ) -> Self {
        Self {
            id: Some(id),
            shipping_type: shipping_type.into(),
            weight,
            shipping_date,
            carrier_id,
        }
    }

    /// Store-assigned identity, absent until persisted.
    #[must_use]
    pub const fn id(&self) -> Option<PackageId> {
        self.id
    }

    /// Free-form shipping type label.
    #[must_use]
    pub fn shipping_type(&self) -> &str {
        self.shipping_type.as_str()
    }

    /// Exact weight.
    #[must_use]
    pub const fn weight(&self) -> Decimal {
        self.weight
    }

    /// Calendar shipping date.
    #[must_use]
    pub const fn shipping_date(&self) -> NaiveDate {
        self.shipping_date
    }

    /// Id of the carrying truck, absent while unassigned.
    #[must_use]
    pub const fn carrier_id(&self) -> Option<TruckId> {
        self.carrier_id
    }

    /// Replace the shipping type label.
    pub fn set_shipping_type(&mut self, shipping_type: impl Into<String>) {
        self.shipping_type = shipping_type.into();
    }

    /// Replace the weight.
    pub fn set_weight(&mut self, weight: Decimal) {
        self.weight = weight;
    }

    /// Replace the shipping date.
    pub fn set_shipping_date(&mut self, shipping_date: NaiveDate) {
        self.shipping_date = shipping_date;
    }

    /// Record the truck now carrying this package.
    pub fn assign_carrier(&mut self, truck_id: TruckId) {
        self.carrier_id = Some(truck_id);
    }

    /// Mark the package unassigned.
    pub fn clear_carrier(&mut self) {
        self.carrier_id = None;
    }
}
