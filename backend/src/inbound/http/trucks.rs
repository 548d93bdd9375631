//! Truck resource handlers.
//!
//! ```text
//! POST   /trucks
//! GET    /trucks?limit=&offset=
//! GET    /trucks/{truck_id}
//! PATCH  /trucks/{truck_id}
//! PUT    /trucks/{truck_id}
//! DELETE /trucks/{truck_id}
//! PUT    /trucks/{truck_id}/packages/{package_id}
//! DELETE /trucks/{truck_id}/packages/{package_id}
//! ```
//!
//! Every route requires a verified bearer subject; trucks are visible and
//! mutable only to their owner.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::truck_service::{AssignmentOutcome, TruckPatch, UnassignmentOutcome};
use crate::domain::{ApiResult, Error, PackageId, Truck, TruckId};
use crate::inbound::http::auth::BearerClaims;
use crate::inbound::http::links::{collection_url, package_link, request_base, truck_link};
use crate::inbound::http::state::AppState;
use crate::inbound::http::validation::{PageQuery, require_json_accept};

const NO_TRUCK: &str = "No truck with this truck_id exists";
const NOT_OWNER: &str = "The truck is owned by someone else";
const MISSING_PAIR: &str = "The specified truck and/or package does not exist";
const ALREADY_LOADED: &str = "The package is already loaded on another truck";
const NOT_LOADED: &str =
    "No truck with this truck_id is loaded with the package with this package_id";

/// Body for `POST /trucks` and `PUT /trucks/{truck_id}`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateTruckRequest {
    /// Free-form truck type, e.g. `"Box truck"`.
    #[serde(rename = "type")]
    pub truck_type: String,
    /// Truck length in feet.
    pub length: u32,
    /// Axle count.
    pub axles: u32,
}

/// Body for `PATCH /trucks/{truck_id}`; omitted fields stay unchanged.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields, default)]
pub struct UpdateTruckRequest {
    /// Replacement truck type, when supplied.
    #[serde(rename = "type")]
    pub truck_type: Option<String>,
    /// Replacement length, when supplied.
    pub length: Option<u32>,
    /// Replacement axle count, when supplied.
    pub axles: Option<u32>,
}

/// Reference to a carried package.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PackageRef {
    /// Package id.
    pub id: String,
    /// Canonical link to the package.
    #[serde(rename = "self")]
    pub self_link: String,
}

/// Wire representation of a truck.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TruckResponse {
    /// Truck id.
    pub id: String,
    /// Free-form truck type.
    #[serde(rename = "type")]
    pub truck_type: String,
    /// Truck length in feet.
    pub length: u32,
    /// Axle count.
    pub axles: u32,
    /// Auth subject of the managing user.
    pub owner: String,
    /// Packages currently loaded on the truck.
    pub packages: Vec<PackageRef>,
    /// Canonical link to this truck.
    #[serde(rename = "self")]
    pub self_link: String,
}

impl TruckResponse {
    fn from_entity(truck: &Truck, base: &str) -> Self {
        let id = truck.id().map_or_else(String::new, |id| id.to_string());
        let self_link = truck
            .id()
            .map_or_else(String::new, |id| truck_link(base, id));
        Self {
            id,
            truck_type: truck.truck_type().to_owned(),
            length: truck.truck_length(),
            axles: truck.axles(),
            owner: truck.owner().to_string(),
            packages: truck
                .package_ids()
                .iter()
                .map(|package_id| PackageRef {
                    id: package_id.to_string(),
                    self_link: package_link(base, *package_id),
                })
                .collect(),
            self_link,
        }
    }
}

/// One page of trucks plus the `next` link.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TruckListResponse {
    /// Trucks on this page.
    pub trucks: Vec<TruckResponse>,
    /// Link to the next page, absent on the final page.
    pub next: Option<String>,
}

fn parse_truck_id(raw: &str) -> Result<TruckId, Error> {
    raw.parse().map_err(|_| Error::not_found(NO_TRUCK))
}

fn parse_package_id(raw: &str) -> Result<PackageId, Error> {
    raw.parse().map_err(|_| Error::not_found(MISSING_PAIR))
}

async fn owned_truck(
    state: &AppState,
    claims: &BearerClaims,
    id: TruckId,
) -> Result<Truck, Error> {
    let Some(truck) = state.trucks().get_truck(id).await? else {
        return Err(Error::not_found(NO_TRUCK));
    };
    if truck.owner() != claims.sub() {
        return Err(Error::forbidden(NOT_OWNER));
    }
    Ok(truck)
}

/// Register a truck for the authenticated manager.
#[utoipa::path(
    post,
    path = "/trucks",
    request_body = CreateTruckRequest,
    responses(
        (status = 201, description = "Truck created", body = TruckResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised"),
        (status = 406, description = "Not acceptable", body = Error),
        (status = 415, description = "Unsupported media type", body = Error)
    ),
    tags = ["trucks"],
    operation_id = "createTruck"
)]
#[post("")]
pub async fn create_truck(
    req: HttpRequest,
    state: web::Data<AppState>,
    claims: BearerClaims,
    payload: web::Json<CreateTruckRequest>,
) -> ApiResult<HttpResponse> {
    require_json_accept(&req)?;
    let base = request_base(&req);
    let body = payload.into_inner();
    let owner = claims.into_sub();

    let id = state
        .trucks()
        .create_truck(body.truck_type.clone(), body.length, body.axles, owner.clone())
        .await?;

    let response = TruckResponse {
        id: id.to_string(),
        truck_type: body.truck_type,
        length: body.length,
        axles: body.axles,
        owner: owner.to_string(),
        packages: Vec::new(),
        self_link: truck_link(&base, id),
    };
    Ok(HttpResponse::Created().json(response))
}

/// List the caller's trucks, paged.
#[utoipa::path(
    get,
    path = "/trucks",
    params(PageQuery),
    responses(
        (status = 200, description = "The caller's trucks", body = TruckListResponse),
        (status = 401, description = "Unauthorised"),
        (status = 406, description = "Not acceptable", body = Error)
    ),
    tags = ["trucks"],
    operation_id = "listTrucks"
)]
#[get("")]
pub async fn list_trucks(
    req: HttpRequest,
    state: web::Data<AppState>,
    claims: BearerClaims,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    require_json_accept(&req)?;
    let base = request_base(&req);
    let page_request = query.into_inner().page_request()?;

    let page = state
        .trucks()
        .get_trucks_for_owner(claims.sub(), page_request)
        .await?;
    let (items, has_more) = page.into_parts();

    let next = collection_url(&base, "trucks")
        .and_then(|url| pagination::next_link(&url, &page_request, has_more));
    let response = TruckListResponse {
        trucks: items
            .iter()
            .map(|truck| TruckResponse::from_entity(truck, &base))
            .collect(),
        next,
    };
    Ok(HttpResponse::Ok().json(response))
}

/// Fetch one truck; owners only.
#[utoipa::path(
    get,
    path = "/trucks/{truck_id}",
    responses(
        (status = 200, description = "The truck", body = TruckResponse),
        (status = 401, description = "Unauthorised"),
        (status = 403, description = "Owned by someone else", body = Error),
        (status = 404, description = "No such truck", body = Error)
    ),
    tags = ["trucks"],
    operation_id = "getTruck"
)]
#[get("/{truck_id}")]
pub async fn get_truck(
    req: HttpRequest,
    state: web::Data<AppState>,
    claims: BearerClaims,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    require_json_accept(&req)?;
    let id = parse_truck_id(&path)?;
    let truck = owned_truck(&state, &claims, id).await?;
    let base = request_base(&req);
    Ok(HttpResponse::Ok().json(TruckResponse::from_entity(&truck, &base)))
}

/// Partially update one truck; owners only.
#[utoipa::path(
    patch,
    path = "/trucks/{truck_id}",
    request_body = UpdateTruckRequest,
    responses(
        (status = 200, description = "Updated truck", body = TruckResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised"),
        (status = 403, description = "Owned by someone else", body = Error),
        (status = 404, description = "No such truck", body = Error)
    ),
    tags = ["trucks"],
    operation_id = "editTruck"
)]
#[patch("/{truck_id}")]
pub async fn edit_truck(
    req: HttpRequest,
    state: web::Data<AppState>,
    claims: BearerClaims,
    path: web::Path<String>,
    payload: web::Json<UpdateTruckRequest>,
) -> ApiResult<HttpResponse> {
    require_json_accept(&req)?;
    let id = parse_truck_id(&path)?;
    owned_truck(&state, &claims, id).await?;

    let body = payload.into_inner();
    let patch = TruckPatch {
        truck_type: body.truck_type,
        truck_length: body.length,
        axles: body.axles,
        clear_package_ids: false,
    };
    let updated = state
        .trucks()
        .edit_truck(id, patch)
        .await?
        .ok_or_else(|| Error::not_found(NO_TRUCK))?;

    let base = request_base(&req);
    Ok(HttpResponse::Ok().json(TruckResponse::from_entity(&updated, &base)))
}

/// Fully replace one truck, emptying its package set; owners only.
#[utoipa::path(
    put,
    path = "/trucks/{truck_id}",
    request_body = CreateTruckRequest,
    responses(
        (status = 303, description = "Replaced; see the canonical resource"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised"),
        (status = 403, description = "Owned by someone else", body = Error),
        (status = 404, description = "No such truck", body = Error)
    ),
    tags = ["trucks"],
    operation_id = "replaceTruck"
)]
#[put("/{truck_id}")]
pub async fn replace_truck(
    req: HttpRequest,
    state: web::Data<AppState>,
    claims: BearerClaims,
    path: web::Path<String>,
    payload: web::Json<CreateTruckRequest>,
) -> ApiResult<HttpResponse> {
    require_json_accept(&req)?;
    let id = parse_truck_id(&path)?;
    owned_truck(&state, &claims, id).await?;

    let body = payload.into_inner();
    let patch = TruckPatch {
        truck_type: Some(body.truck_type),
        truck_length: Some(body.length),
        axles: Some(body.axles),
        clear_package_ids: true,
    };
    state
        .trucks()
        .edit_truck(id, patch)
        .await?
        .ok_or_else(|| Error::not_found(NO_TRUCK))?;

    let base = request_base(&req);
    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, truck_link(&base, id)))
        .finish())
}

/// Delete one truck, releasing its packages; owners only.
#[utoipa::path(
    delete,
    path = "/trucks/{truck_id}",
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised"),
        (status = 403, description = "Owned by someone else", body = Error),
        (status = 404, description = "No such truck", body = Error)
    ),
    tags = ["trucks"],
    operation_id = "deleteTruck"
)]
#[delete("/{truck_id}")]
pub async fn delete_truck(
    state: web::Data<AppState>,
    claims: BearerClaims,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_truck_id(&path)?;
    owned_truck(&state, &claims, id).await?;

    if state.trucks().delete_truck(id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(Error::not_found(NO_TRUCK))
    }
}

/// Load a package onto the caller's truck.
#[utoipa::path(
    put,
    path = "/trucks/{truck_id}/packages/{package_id}",
    responses(
        (status = 204, description = "Package loaded"),
        (status = 401, description = "Unauthorised"),
        (status = 403, description = "Owned by someone else", body = Error),
        (status = 404, description = "Truck or package missing", body = Error),
        (status = 409, description = "Loaded on another truck", body = Error)
    ),
    tags = ["trucks"],
    operation_id = "assignPackage"
)]
#[put("/{truck_id}/packages/{package_id}")]
pub async fn assign_package(
    state: web::Data<AppState>,
    claims: BearerClaims,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (raw_truck, raw_package) = path.into_inner();
    let truck_id = parse_truck_id(&raw_truck).map_err(|_| Error::not_found(MISSING_PAIR))?;
    let package_id = parse_package_id(&raw_package)?;
    owned_truck(&state, &claims, truck_id)
        .await
        .map_err(|err| match err.code() {
            crate::domain::ErrorCode::NotFound => Error::not_found(MISSING_PAIR),
            _ => err,
        })?;

    match state
        .trucks()
        .assign_package(truck_id, package_id)
        .await?
    {
        AssignmentOutcome::Completed => Ok(HttpResponse::NoContent().finish()),
        AssignmentOutcome::TruckMissing | AssignmentOutcome::PackageMissing => {
            Err(Error::not_found(MISSING_PAIR))
        }
        AssignmentOutcome::CarriedByAnotherTruck => Err(Error::conflict(ALREADY_LOADED)),
    }
}

/// Unload a package from the caller's truck.
#[utoipa::path(
    delete,
    path = "/trucks/{truck_id}/packages/{package_id}",
    responses(
        (status = 204, description = "Package unloaded"),
        (status = 401, description = "Unauthorised"),
        (status = 403, description = "Owned by someone else", body = Error),
        (status = 404, description = "Not loaded on this truck", body = Error)
    ),
    tags = ["trucks"],
    operation_id = "unassignPackage"
)]
#[delete("/{truck_id}/packages/{package_id}")]
pub async fn unassign_package(
    state: web::Data<AppState>,
    claims: BearerClaims,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (raw_truck, raw_package) = path.into_inner();
    let truck_id = parse_truck_id(&raw_truck).map_err(|_| Error::not_found(NOT_LOADED))?;
    let package_id = parse_package_id(&raw_package).map_err(|_| Error::not_found(NOT_LOADED))?;
    owned_truck(&state, &claims, truck_id)
        .await
        .map_err(|err| match err.code() {
            crate::domain::ErrorCode::NotFound => Error::not_found(NOT_LOADED),
            _ => err,
        })?;

    match state
        .trucks()
        .unassign_package(truck_id, package_id)
        .await?
    {
        UnassignmentOutcome::Completed => Ok(HttpResponse::NoContent().finish()),
        UnassignmentOutcome::TruckMissing
        | UnassignmentOutcome::PackageMissing
        | UnassignmentOutcome::NotCarried => Err(Error::not_found(NOT_LOADED)),
    }
}
