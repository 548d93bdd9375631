//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod links;
pub mod managers;
pub mod packages;
pub mod state;
pub mod trucks;
pub mod validation;

use actix_web::web;

pub use state::AppState;

/// Register every resource scope on the application.
///
/// Callers attach [`AppState`] and a `HealthState` as app data and wrap the
/// app in the trace middleware; this only wires the routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .service(
            web::scope("/trucks")
                .service(trucks::create_truck)
                .service(trucks::list_trucks)
                .service(trucks::assign_package)
                .service(trucks::unassign_package)
                .service(trucks::get_truck)
                .service(trucks::edit_truck)
                .service(trucks::replace_truck)
                .service(trucks::delete_truck),
        )
        .service(
            web::scope("/packages")
                .service(packages::create_package)
                .service(packages::list_packages)
                .service(packages::get_package)
                .service(packages::edit_package)
                .service(packages::replace_package)
                .service(packages::delete_package),
        )
        .service(
            web::scope("/truckmanagers")
                .service(managers::list_truck_managers)
                .service(managers::register_truck_manager),
        )
        .service(health::ready)
        .service(health::live);
}
