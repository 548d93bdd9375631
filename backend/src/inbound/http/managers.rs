//! Truck manager resource handlers.
//!
//! ```text
//! GET  /truckmanagers
//! POST /truckmanagers
//! ```
//!
//! Registration is the re-login path: the handler looks the verified subject
//! up first and replays the existing record instead of duplicating it — the
//! create use case itself never deduplicates.

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::Serialize;

use crate::domain::{ApiResult, TruckManager};
use crate::inbound::http::auth::BearerClaims;
use crate::inbound::http::links::{request_base, truck_link};
use crate::inbound::http::state::AppState;
use crate::inbound::http::validation::require_json_accept;

/// Reference to an owned truck.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct OwnedTruckRef {
    /// Truck id.
    pub id: String,
    /// Canonical link to the truck.
    #[serde(rename = "self")]
    pub self_link: String,
}

/// Wire representation of a truck manager.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ManagerResponse {
    /// Manager row id.
    pub id: String,
    /// External auth subject.
    pub auth_id: String,
    /// Trucks owned by this manager (derived from truck ownership).
    pub trucks: Vec<OwnedTruckRef>,
}

impl ManagerResponse {
    fn from_entity(manager: &TruckManager, base: &str) -> Self {
        Self {
            id: manager.id().map_or_else(String::new, |id| id.to_string()),
            auth_id: manager.auth_id().to_string(),
            trucks: manager
                .truck_ids()
                .iter()
                .map(|truck_id| OwnedTruckRef {
                    id: truck_id.to_string(),
                    self_link: truck_link(base, *truck_id),
                })
                .collect(),
        }
    }
}

/// Every registered manager.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ManagerListResponse {
    /// Registered managers.
    pub users: Vec<ManagerResponse>,
}

/// List every registered truck manager.
#[utoipa::path(
    get,
    path = "/truckmanagers",
    responses(
        (status = 200, description = "Registered managers", body = ManagerListResponse),
        (status = 406, description = "Not acceptable", body = crate::domain::Error)
    ),
    tags = ["truckmanagers"],
    operation_id = "listTruckManagers"
)]
#[get("")]
pub async fn list_truck_managers(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    require_json_accept(&req)?;
    let base = request_base(&req);
    let managers = state.managers().get_all_truck_managers().await?;
    let response = ManagerListResponse {
        users: managers
            .iter()
            .map(|manager| ManagerResponse::from_entity(manager, &base))
            .collect(),
    };
    Ok(HttpResponse::Ok().json(response))
}

/// Register the verified subject as a truck manager.
///
/// Replays the existing record when the subject is already registered, so
/// repeated logins stay idempotent even though the create use case does not
/// deduplicate.
#[utoipa::path(
    post,
    path = "/truckmanagers",
    responses(
        (status = 200, description = "Already registered", body = ManagerResponse),
        (status = 201, description = "Newly registered", body = ManagerResponse),
        (status = 401, description = "Unauthorised")
    ),
    tags = ["truckmanagers"],
    operation_id = "registerTruckManager"
)]
#[post("")]
pub async fn register_truck_manager(
    req: HttpRequest,
    state: web::Data<AppState>,
    claims: BearerClaims,
) -> ApiResult<HttpResponse> {
    require_json_accept(&req)?;
    let base = request_base(&req);
    let auth_id = claims.into_sub();

    if let Some(existing) = state
        .managers()
        .get_truck_manager_by_auth_id(&auth_id)
        .await?
    {
        return Ok(HttpResponse::Ok().json(ManagerResponse::from_entity(&existing, &base)));
    }

    let id = state
        .managers()
        .create_truck_manager(auth_id.clone())
        .await?;
    let manager = state
        .managers()
        .get_truck_manager(id)
        .await?
        .unwrap_or_else(|| {
            TruckManager::restore(id, auth_id, std::collections::BTreeSet::new())
        });
    Ok(HttpResponse::Created().json(ManagerResponse::from_entity(&manager, &base)))
}
