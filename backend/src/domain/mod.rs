//! Domain model, persistence contracts, and application services.
//!
//! Entities stay pure and transport agnostic; all persistence flows through
//! the repositories a [`UnitOfWork`] hands out, and every use case in the
//! services commits exactly once or not at all. Inbound adapters map the
//! domain [`Error`] and [`AuthError`] payloads to the wire.

pub mod auth;
pub mod error;
pub mod ids;
pub mod manager;
pub mod manager_service;
pub mod package;
pub mod package_service;
pub mod ports;
pub mod repository;
pub mod truck;
pub mod truck_service;
pub mod unit_of_work;

pub use self::auth::{AuthError, AuthErrorKind};
pub use self::error::{Error, ErrorCode};
pub use self::ids::{AuthId, AuthIdError, ManagerId, PackageId, ParseIdError, TruckId};
pub use self::manager::TruckManager;
pub use self::manager_service::ManagerService;
pub use self::package::Package;
pub use self::package_service::{PackagePatch, PackageService};
pub use self::truck::Truck;
pub use self::truck_service::{
    AssignmentOutcome, TruckPatch, TruckService, UnassignmentOutcome,
};
pub use self::unit_of_work::{UnitOfWork, UnitOfWorkFactory};

/// Convenient result alias for handlers returning domain errors.
pub type ApiResult<T> = Result<T, Error>;
