//! Truck manager aggregate.
//!
//! A manager is created on first successful external login and keyed by the
//! provider's subject id. The owned-truck set is a derived index: the
//! persisted record stores only the auth subject, and repositories recompute
//! the set from an indexed query over truck owners.

use std::collections::BTreeSet;

use crate::domain::ids::{AuthId, ManagerId, TruckId};

/// A user managing zero or more trucks.
///
/// ## Invariants
/// - `id` is `None` until the store assigns one on first persist.
/// - `auth_id` is immutable after creation.
/// - `truck_ids` holds each owned truck id exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruckManager {
    id: Option<ManagerId>,
    auth_id: AuthId,
    truck_ids: BTreeSet<TruckId>,
}

impl TruckManager {
    /// Build an unsaved manager for a new external identity.
    pub fn new(auth_id: AuthId) -> Self {
        Self {
            id: None,
            auth_id,
            truck_ids: BTreeSet::new(),
        }
    }

    /// Rebuild a persisted manager, with the derived truck set attached.
    pub fn restore(id: ManagerId, auth_id: AuthId, truck_ids: BTreeSet<TruckId>) -> Self {
        Self {
            id: Some(id),
            auth_id,
            truck_ids,
        }
    }

    /// Store-assigned identity, absent until persisted.
    #[must_use]
    pub const fn id(&self) -> Option<ManagerId> {
        self.id
    }

    /// External identity-provider subject.
    #[must_use]
    pub const fn auth_id(&self) -> &AuthId {
        &self.auth_id
    }

    /// Ids of the trucks this manager owns.
    #[must_use]
    pub const fn truck_ids(&self) -> &BTreeSet<TruckId> {
        &self.truck_ids
    }

    /// Add a truck id to the set; assigning a present id is a no-op.
    pub fn assign_truck(&mut self, id: TruckId) {
        self.truck_ids.insert(id);
    }

    /// Remove a truck id from the set; removing an absent id is a no-op.
    pub fn unassign_truck(&mut self, id: TruckId) {
        self.truck_ids.remove(&id);
    }

    /// Whether this manager owns any truck.
    #[must_use]
    pub fn has_assigned_trucks(&self) -> bool {
        !self.truck_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn manager() -> TruckManager {
        TruckManager::new(AuthId::new("abc123").expect("subject"))
    }

    #[rstest]
    fn assigning_a_truck_is_visible() {
        let mut user = manager();
        let truck_id = TruckId::new(7251);

        user.assign_truck(truck_id);

        assert!(user.has_assigned_trucks());
        assert_eq!(user.truck_ids().len(), 1);
        assert!(user.truck_ids().contains(&truck_id));
    }

    #[rstest]
    fn assigning_the_same_truck_twice_is_idempotent() {
        let mut user = manager();
        let truck_id = TruckId::new(7251);

        user.assign_truck(truck_id);
        user.assign_truck(truck_id);

        assert_eq!(user.truck_ids().len(), 1);
    }

    #[rstest]
    fn unassigning_removes_the_truck() {
        let mut user = manager();
        let truck_id = TruckId::new(7251);
        user.assign_truck(truck_id);

        user.unassign_truck(truck_id);

        assert!(!user.has_assigned_trucks());
        assert!(!user.truck_ids().contains(&truck_id));
    }

    #[rstest]
    fn unassigning_an_absent_truck_is_a_silent_no_op() {
        let mut user = manager();
        user.unassign_truck(TruckId::new(404));
        assert!(!user.has_assigned_trucks());
    }
}
