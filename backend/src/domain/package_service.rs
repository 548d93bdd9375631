//! Package use cases.
//!
//! Every method opens exactly one unit of work and commits at most once.
//! Edits or deletes that detach a package from its carrier rewrite the
//! truck's package set in the same transaction.

use chrono::NaiveDate;
use pagination::{Page, PageRequest};
use rust_decimal::Decimal;

use crate::domain::error::Error;
use crate::domain::ids::PackageId;
use crate::domain::package::Package;
use crate::domain::ports::StoreError;
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};

/// Partial update for a package.
///
/// `None` means "leave unchanged"; a supplied value always applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackagePatch {
    /// Replacement shipping type, when supplied.
    pub shipping_type: Option<String>,
    /// Replacement weight, when supplied.
    pub weight: Option<Decimal>,
    /// Replacement shipping date, when supplied.
    pub shipping_date: Option<NaiveDate>,
    /// Detach the package from its carrier as part of the same commit.
    pub clear_carrier: bool,
}

fn map_store_error(error: StoreError) -> Error {
    match error {
        StoreError::Unavailable { message } => {
            Error::service_unavailable(format!("store unavailable: {message}"))
        }
        other => Error::internal(other.to_string()),
    }
}

/// Application service for package use cases.
#[derive(Clone)]
pub struct PackageService {
    uow: UnitOfWorkFactory,
}

impl PackageService {
    /// Bind the service to a unit-of-work factory.
    #[must_use]
    pub fn new(uow: UnitOfWorkFactory) -> Self {
        Self { uow }
    }

    async fn begin(&self) -> Result<UnitOfWork, Error> {
        self.uow.begin().await.map_err(map_store_error)
    }

    /// Register a new, unassigned package.
    ///
    /// # Errors
    /// Fails only on store faults.
    pub async fn create_package(
        &self,
        shipping_type: String,
        weight: Decimal,
        shipping_date: NaiveDate,
    ) -> Result<PackageId, Error> {
        let mut uow = self.begin().await?;
        let package = Package::new(shipping_type, weight, shipping_date);
        let id = uow.packages().add(&package).await.map_err(map_store_error)?;
        uow.commit().await.map_err(map_store_error)?;
        Ok(id)
    }

    /// Look up one package; absence is a value.
    ///
    /// # Errors
    /// Fails only on store faults.
    pub async fn get_package(&self, id: PackageId) -> Result<Option<Package>, Error> {
        let mut uow = self.begin().await?;
        uow.packages().get(id).await.map_err(map_store_error)
    }

    /// Page through every registered package in store order.
    ///
    /// # Errors
    /// Fails only on store faults.
    pub async fn get_packages(&self, page: PageRequest) -> Result<Page<Package>, Error> {
        let mut uow = self.begin().await?;
        uow.packages().get_list(page).await.map_err(map_store_error)
    }

    /// Apply a partial update; returns the updated package, or `None` when
    /// no package exists with the given id.
    ///
    /// Clearing the carrier also removes the package id from the carrying
    /// truck's set inside the same commit.
    ///
    /// # Errors
    /// Fails only on store faults.
    pub async fn edit_package(
        &self,
        id: PackageId,
        patch: PackagePatch,
    ) -> Result<Option<Package>, Error> {
        let mut uow = self.begin().await?;
        let Some(mut package) = uow.packages().get(id).await.map_err(map_store_error)? else {
            return Ok(None);
        };

        if let Some(shipping_type) = patch.shipping_type {
            package.set_shipping_type(shipping_type);
        }
        if let Some(weight) = patch.weight {
            package.set_weight(weight);
        }
        if let Some(shipping_date) = patch.shipping_date {
            package.set_shipping_date(shipping_date);
        }
        if patch.clear_carrier {
            if let Some(truck_id) = package.carrier_id() {
                if let Some(mut truck) =
                    uow.trucks().get(truck_id).await.map_err(map_store_error)?
                {
                    truck.unassign_package_id(id);
                    uow.trucks().add(&truck).await.map_err(map_store_error)?;
                }
            }
            package.clear_carrier();
        }

        uow.packages().add(&package).await.map_err(map_store_error)?;
        uow.commit().await.map_err(map_store_error)?;
        Ok(Some(package))
    }

    /// Delete a package, unloading it from its carrier in the same commit.
    ///
    /// Returns whether a deletion occurred; deleting a missing id commits
    /// and reports `false` instead of failing.
    ///
    /// # Errors
    /// Fails only on store faults.
    pub async fn delete_package(&self, id: PackageId) -> Result<bool, Error> {
        let mut uow = self.begin().await?;
        let existing = uow.packages().get(id).await.map_err(map_store_error)?;
        if let Some(package) = &existing {
            if let Some(truck_id) = package.carrier_id() {
                if let Some(mut truck) =
                    uow.trucks().get(truck_id).await.map_err(map_store_error)?
                {
                    truck.unassign_package_id(id);
                    uow.trucks().add(&truck).await.map_err(map_store_error)?;
                }
            }
        }
        let removed = uow.packages().remove(id).await.map_err(map_store_error)?;
        uow.commit().await.map_err(map_store_error)?;
        Ok(removed.is_some())
    }
}
