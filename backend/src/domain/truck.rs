//! Truck aggregate.
//!
//! A truck is owned by the auth subject that registered it and carries a set
//! of package ids. The id-set is the ground truth for the truck→package edge;
//! mutators are pure and idempotent, with persistence handled entirely by the
//! repositories.

use std::collections::BTreeSet;

use crate::domain::ids::{AuthId, PackageId, TruckId};

/// A registered truck.
///
/// ## Invariants
/// - `id` is `None` until the store assigns one on first persist.
/// - `package_ids` holds each carried package id exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truck {
    id: Option<TruckId>,
    truck_type: String,
    truck_length: u32,
    axles: u32,
    owner: AuthId,
    package_ids: BTreeSet<PackageId>,
}

impl Truck {
    /// Build an unsaved truck with an empty package set.
    pub fn new(
        truck_type: impl Into<String>,
        truck_length: u32,
        axles: u32,
        owner: AuthId,
    ) -> Self {
        Self {
            id: None,
            truck_type: truck_type.into(),
            truck_length,
            axles,
            owner,
            package_ids: BTreeSet::new(),
        }
    }

    /// Rebuild a persisted truck from its stored fields.
    pub fn restore(
        id: TruckId,
        truck_type: impl Into<String>,
        truck_length: u32,
        axles: u32,
        owner: AuthId,
        package_ids: BTreeSet<PackageId>,
    ) -> Self {
        Self {
            id: Some(id),
            truck_type: truck_type.into(),
            truck_length,
            axles,
            owner,
            package_ids,
        }
    }

    /// Store-assigned identity, absent until persisted.
    #[must_use]
    pub const fn id(&self) -> Option<TruckId> {
        self.id
    }

    /// Free-form truck type label.
    #[must_use]
    pub fn truck_type(&self) -> &str {
        self.truck_type.as_str()
    }

    /// Truck length in feet.
    #[must_use]
    pub const fn truck_length(&self) -> u32 {
        self.truck_length
    }

    /// Axle count.
    #[must_use]
    pub const fn axles(&self) -> u32 {
        self.axles
    }

    /// Auth subject of the managing user.
    #[must_use]
    pub const fn owner(&self) -> &AuthId {
        &self.owner
    }

    /// Ids of the packages currently loaded on this truck.
    #[must_use]
    pub const fn package_ids(&self) -> &BTreeSet<PackageId> {
        &self.package_ids
    }

    /// Replace the truck type label.
    pub fn set_truck_type(&mut self, truck_type: impl Into<String>) {
        self.truck_type = truck_type.into();
    }

    /// Replace the truck length.
    pub fn set_truck_length(&mut self, truck_length: u32) {
        self.truck_length = truck_length;
    }

    /// Replace the axle count.
    pub fn set_axles(&mut self, axles: u32) {
        self.axles = axles;
    }

    /// Add a package id to the set; assigning a present id is a no-op.
    pub fn assign_package_id(&mut self, id: PackageId) {
        self.package_ids.insert(id);
    }

    /// Remove a package id from the set; removing an absent id is a no-op.
    pub fn unassign_package_id(&mut self, id: PackageId) {
        self.package_ids.remove(&id);
    }

    /// Drop every package assignment.
    pub fn clear_package_ids(&mut self) {
        self.package_ids.clear();
    }

    /// Whether any package is loaded on this truck.
    #[must_use]
    pub fn has_packages(&self) -> bool {
        !self.package_ids.is_empty()
    }
}
