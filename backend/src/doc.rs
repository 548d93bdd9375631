//! OpenAPI documentation for the REST surface.
//!
//! Registers every endpoint and wire schema plus the bearer security scheme.
//! The generated document is served to external tooling; no UI is bundled.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::{managers, packages, trucks};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the trucks-and-packages API.
#[derive(OpenApi)]
#[openapi(
    paths(
        trucks::create_truck,
        trucks::list_trucks,
        trucks::get_truck,
        trucks::edit_truck,
        trucks::replace_truck,
        trucks::delete_truck,
        trucks::assign_package,
        trucks::unassign_package,
        packages::create_package,
        packages::list_packages,
        packages::get_package,
        packages::edit_package,
        packages::replace_package,
        packages::delete_package,
        managers::list_truck_managers,
        managers::register_truck_manager,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        trucks::CreateTruckRequest,
        trucks::UpdateTruckRequest,
        trucks::TruckResponse,
        trucks::TruckListResponse,
        trucks::PackageRef,
        packages::CreatePackageRequest,
        packages::UpdatePackageRequest,
        packages::PackageResponse,
        packages::PackageListResponse,
        packages::CarrierRef,
        managers::ManagerResponse,
        managers::ManagerListResponse,
        managers::OwnedTruckRef,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "trucks", description = "Ownership-scoped truck registry"),
        (name = "packages", description = "Public package registry"),
        (name = "truckmanagers", description = "Registered truck managers"),
        (name = "health", description = "Probes"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_includes_every_resource_scope() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().expect("document serialises");
        for path in ["/trucks", "/packages", "/truckmanagers", "/health/ready"] {
            assert!(json.contains(path), "missing {path} in OpenAPI document");
        }
    }
}
