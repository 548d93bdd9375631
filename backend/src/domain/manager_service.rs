//! Truck manager use cases.
//!
//! Creation does not deduplicate: re-login safety is the caller's job, which
//! must look the subject up first (the registration handler does exactly
//! that). Two bare create calls therefore produce two rows with the same
//! auth subject.

use crate::domain::error::Error;
use crate::domain::ids::{AuthId, ManagerId};
use crate::domain::manager::TruckManager;
use crate::domain::ports::StoreError;
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};

fn map_store_error(error: StoreError) -> Error {
    match error {
        StoreError::Unavailable { message } => {
            Error::service_unavailable(format!("store unavailable: {message}"))
        }
        other => Error::internal(other.to_string()),
    }
}

/// Application service for truck manager use cases.
#[derive(Clone)]
pub struct ManagerService {
    uow: UnitOfWorkFactory,
}

impl ManagerService {
    /// Bind the service to a unit-of-work factory.
    #[must_use]
    pub fn new(uow: UnitOfWorkFactory) -> Self {
        Self { uow }
    }

    async fn begin(&self) -> Result<UnitOfWork, Error> {
        self.uow.begin().await.map_err(map_store_error)
    }

    /// Create a manager row for a new external identity.
    ///
    /// Does not check for an existing row with the same subject.
    ///
    /// # Errors
    /// Fails only on store faults.
    pub async fn create_truck_manager(&self, auth_id: AuthId) -> Result<ManagerId, Error> {
        let mut uow = self.begin().await?;
        let manager = TruckManager::new(auth_id);
        let id = uow.managers().add(&manager).await.map_err(map_store_error)?;
        uow.commit().await.map_err(map_store_error)?;
        Ok(id)
    }

    /// Every registered manager, each with its derived truck set.
    ///
    /// # Errors
    /// Fails only on store faults.
    pub async fn get_all_truck_managers(&self) -> Result<Vec<TruckManager>, Error> {
        let mut uow = self.begin().await?;
        uow.managers().get_all().await.map_err(map_store_error)
    }

    /// Look up one manager by row id; absence is a value.
    ///
    /// # Errors
    /// Fails only on store faults.
    pub async fn get_truck_manager(
        &self,
        id: ManagerId,
    ) -> Result<Option<TruckManager>, Error> {
        let mut uow = self.begin().await?;
        uow.managers().get(id).await.map_err(map_store_error)
    }

    /// Look up the manager registered for an external subject, if any.
    ///
    /// # Errors
    /// Fails only on store faults.
    pub async fn get_truck_manager_by_auth_id(
        &self,
        auth_id: &AuthId,
    ) -> Result<Option<TruckManager>, Error> {
        let mut uow = self.begin().await?;
        uow.managers()
            .find_by_auth_id(auth_id)
            .await
            .map_err(map_store_error)
    }
}
