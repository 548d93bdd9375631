//! Truck use cases.
//!
//! Every method opens exactly one unit of work and commits at most once.
//! Mutations that touch both sides of the truck↔package edge rewrite both
//! records inside the same transaction, so committed state never references
//! a missing counterpart.

use pagination::{Page, PageRequest};

use crate::domain::error::Error;
use crate::domain::ids::{AuthId, PackageId, TruckId};
use crate::domain::ports::StoreError;
use crate::domain::truck::Truck;
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};

/// Partial update for a truck.
///
/// `None` means "leave unchanged"; a supplied value always applies, so a
/// zero-valued or empty update is distinguishable from an omitted field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TruckPatch {
    /// Replacement truck type, when supplied.
    pub truck_type: Option<String>,
    /// Replacement length, when supplied.
    pub truck_length: Option<u32>,
    /// Replacement axle count, when supplied.
    pub axles: Option<u32>,
    /// Reset the package assignment set as part of the same commit.
    pub clear_package_ids: bool,
}

/// Result of an assignment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOutcome {
    /// The package is now carried by the truck (or already was; assigning
    /// an already-carried package is a no-op, not an error).
    Completed,
    /// No truck exists with the given id.
    TruckMissing,
    /// No package exists with the given id.
    PackageMissing,
    /// The package is already carried by a different truck.
    CarriedByAnotherTruck,
}

/// Result of an unassignment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnassignmentOutcome {
    /// The package is no longer carried by the truck.
    Completed,
    /// No truck exists with the given id.
    TruckMissing,
    /// No package exists with the given id.
    PackageMissing,
    /// The package is not carried by this truck.
    NotCarried,
}

fn map_store_error(error: StoreError) -> Error {
    match error {
        StoreError::Unavailable { message } => {
            Error::service_unavailable(format!("store unavailable: {message}"))
        }
        other => Error::internal(other.to_string()),
    }
}

/// Application service for truck use cases.
#[derive(Clone)]
pub struct TruckService {
    uow: UnitOfWorkFactory,
}

impl TruckService {
    /// Bind the service to a unit-of-work factory.
    #[must_use]
    pub fn new(uow: UnitOfWorkFactory) -> Self {
        Self { uow }
    }

    async fn begin(&self) -> Result<UnitOfWork, Error> {
        self.uow.begin().await.map_err(map_store_error)
    }

    /// Register a new truck with an empty package set.
    ///
    /// # Errors
    /// Fails only on store faults.
    pub async fn create_truck(
        &self,
        truck_type: String,
        truck_length: u32,
        axles: u32,
        owner: AuthId,
    ) -> Result<TruckId, Error> {
        let mut uow = self.begin().await?;
        let truck = Truck::new(truck_type, truck_length, axles, owner);
        let id = uow.trucks().add(&truck).await.map_err(map_store_error)?;
        uow.commit().await.map_err(map_store_error)?;
        Ok(id)
    }

    /// Look up one truck; absence is a value.
    ///
    /// # Errors
    /// Fails only on store faults.
    pub async fn get_truck(&self, id: TruckId) -> Result<Option<Truck>, Error> {
        let mut uow = self.begin().await?;
        uow.trucks().get(id).await.map_err(map_store_error)
    }

    /// Page through every registered truck in store order.
    ///
    /// # Errors
    /// Fails only on store faults.
    pub async fn get_trucks(&self, page: PageRequest) -> Result<Page<Truck>, Error> {
        let mut uow = self.begin().await?;
        uow.trucks().get_list(page).await.map_err(map_store_error)
    }

    /// Page through the trucks registered by one subject.
    ///
    /// The ownership index yields the full set; the page window is applied
    /// over it in stable store order.
    ///
    /// # Errors
    /// Fails only on store faults.
    pub async fn get_trucks_for_owner(
        &self,
        owner: &AuthId,
        page: PageRequest,
    ) -> Result<Page<Truck>, Error> {
        let mut uow = self.begin().await?;
        let owned = uow
            .trucks()
            .get_by_owner(owner)
            .await
            .map_err(map_store_error)?;
        let offset = page.offset() as usize;
        let limit = page.limit() as usize;
        let has_more = owned.len() > offset.saturating_add(limit);
        let items = owned.into_iter().skip(offset).take(limit).collect();
        Ok(Page::new(items, has_more))
    }

    /// Apply a partial update; returns the updated truck, or `None` when no
    /// truck exists with the given id.
    ///
    /// Clearing the package set also clears `carrier_id` on every affected
    /// package inside the same commit.
    ///
    /// # Errors
    /// Fails only on store faults.
    pub async fn edit_truck(
        &self,
        id: TruckId,
        patch: TruckPatch,
    ) -> Result<Option<Truck>, Error> {
        let mut uow = self.begin().await?;
        let Some(mut truck) = uow.trucks().get(id).await.map_err(map_store_error)? else {
            return Ok(None);
        };

        if let Some(truck_type) = patch.truck_type {
            truck.set_truck_type(truck_type);
        }
        if let Some(truck_length) = patch.truck_length {
            truck.set_truck_length(truck_length);
        }
        if let Some(axles) = patch.axles {
            truck.set_axles(axles);
        }
        if patch.clear_package_ids {
            let carried = uow
                .packages()
                .get_by_carrier(id)
                .await
                .map_err(map_store_error)?;
            for mut package in carried {
                package.clear_carrier();
                uow.packages().add(&package).await.map_err(map_store_error)?;
            }
            truck.clear_package_ids();
        }

        uow.trucks().add(&truck).await.map_err(map_store_error)?;
        uow.commit().await.map_err(map_store_error)?;
        Ok(Some(truck))
    }

    /// Delete a truck, releasing every carried package in the same commit.
    ///
    /// Returns whether a deletion occurred; deleting a missing id commits
    /// and reports `false` instead of failing.
    ///
    /// # Errors
    /// Fails only on store faults.
    pub async fn delete_truck(&self, id: TruckId) -> Result<bool, Error> {
        let mut uow = self.begin().await?;
        let removed = uow.trucks().remove(id).await.map_err(map_store_error)?;
        if removed.is_some() {
            let carried = uow
                .packages()
                .get_by_carrier(id)
                .await
                .map_err(map_store_error)?;
            for mut package in carried {
                package.clear_carrier();
                uow.packages().add(&package).await.map_err(map_store_error)?;
            }
        }
        uow.commit().await.map_err(map_store_error)?;
        Ok(removed.is_some())
    }

    /// Load a package onto a truck, rewriting both records atomically.
    ///
    /// # Errors
    /// Fails only on store faults.
    pub async fn assign_package(
        &self,
        truck_id: TruckId,
        package_id: PackageId,
    ) -> Result<AssignmentOutcome, Error> {
        let mut uow = self.begin().await?;
        let Some(mut truck) = uow.trucks().get(truck_id).await.map_err(map_store_error)? else {
            return Ok(AssignmentOutcome::TruckMissing);
        };
        let Some(mut package) = uow
            .packages()
            .get(package_id)
            .await
            .map_err(map_store_error)?
        else {
            return Ok(AssignmentOutcome::PackageMissing);
        };

        match package.carrier_id() {
            Some(current) if current == truck_id => return Ok(AssignmentOutcome::Completed),
            Some(_) => return Ok(AssignmentOutcome::CarriedByAnotherTruck),
            None => {}
        }

        package.assign_carrier(truck_id);
        truck.assign_package_id(package_id);
        uow.packages().add(&package).await.map_err(map_store_error)?;
        uow.trucks().add(&truck).await.map_err(map_store_error)?;
        uow.commit().await.map_err(map_store_error)?;
        Ok(AssignmentOutcome::Completed)
    }

    /// Unload a package from a truck, rewriting both records atomically.
    ///
    /// # Errors
    /// Fails only on store faults.
    pub async fn unassign_package(
        &self,
        truck_id: TruckId,
        package_id: PackageId,
    ) -> Result<UnassignmentOutcome, Error> {
        let mut uow = self.begin().await?;
        let Some(mut truck) = uow.trucks().get(truck_id).await.map_err(map_store_error)? else {
            return Ok(UnassignmentOutcome::TruckMissing);
        };
        let Some(mut package) = uow
            .packages()
            .get(package_id)
            .await
            .map_err(map_store_error)?
        else {
            return Ok(UnassignmentOutcome::PackageMissing);
        };

        if package.carrier_id() != Some(truck_id) {
            return Ok(UnassignmentOutcome::NotCarried);
        }

        package.clear_carrier();
        truck.unassign_package_id(package_id);
        uow.packages().add(&package).await.map_err(map_store_error)?;
        uow.trucks().add(&truck).await.map_err(map_store_error)?;
        uow.commit().await.map_err(map_store_error)?;
        Ok(UnassignmentOutcome::Completed)
    }
}
