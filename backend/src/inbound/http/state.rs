//! Shared application state for the HTTP adapter.
//!
//! Constructed once at startup from the injected store connection and token
//! verifier; every request borrows the same service instances.

use std::sync::Arc;

use crate::domain::ports::{TokenVerifier, TransactionalStore};
use crate::domain::{ManagerService, PackageService, TruckService, UnitOfWorkFactory};

/// Services and collaborators the handlers depend on.
#[derive(Clone)]
pub struct AppState {
    trucks: TruckService,
    packages: PackageService,
    managers: ManagerService,
    verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    /// Wire the services onto one store connection and token verifier.
    #[must_use]
    pub fn new(store: Arc<dyn TransactionalStore>, verifier: Arc<dyn TokenVerifier>) -> Self {
        let factory = UnitOfWorkFactory::new(store);
        Self {
            trucks: TruckService::new(factory.clone()),
            packages: PackageService::new(factory.clone()),
            managers: ManagerService::new(factory),
            verifier,
        }
    }

    /// Truck use cases.
    #[must_use]
    pub const fn trucks(&self) -> &TruckService {
        &self.trucks
    }

    /// Package use cases.
    #[must_use]
    pub const fn packages(&self) -> &PackageService {
        &self.packages
    }

    /// Truck manager use cases.
    #[must_use]
    pub const fn managers(&self) -> &ManagerService {
        &self.managers
    }

    /// Bearer token verifier.
    #[must_use]
    pub fn verifier(&self) -> &dyn TokenVerifier {
        self.verifier.as_ref()
    }
}
