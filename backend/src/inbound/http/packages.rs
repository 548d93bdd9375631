//! Package resource handlers.
//!
//! ```text
//! POST   /packages
//! GET    /packages?limit=&offset=
//! GET    /packages/{package_id}
//! PATCH  /packages/{package_id}
//! PUT    /packages/{package_id}
//! DELETE /packages/{package_id}
//! ```
//!
//! Packages are a public resource: anyone may register or inspect them.
//! Weights travel as exact decimal text and dates as `YYYY-MM-DD`.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::package_service::PackagePatch;
use crate::domain::{ApiResult, Error, Package, PackageId};
use crate::inbound::http::links::{collection_url, package_link, request_base, truck_link};
use crate::inbound::http::state::AppState;
use crate::inbound::http::validation::{PageQuery, require_json_accept};

const NO_PACKAGE: &str = "No package with this package_id exists";

/// Body for `POST /packages` and `PUT /packages/{package_id}`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreatePackageRequest {
    /// Free-form shipping type, e.g. `"overnight"`.
    pub shipping_type: String,
    /// Exact decimal weight.
    #[schema(value_type = String, example = "5.0")]
    pub weight: Decimal,
    /// Calendar shipping date.
    pub shipping_date: NaiveDate,
}

/// Body for `PATCH /packages/{package_id}`; omitted fields stay unchanged.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields, default)]
pub struct UpdatePackageRequest {
    /// Replacement shipping type, when supplied.
    pub shipping_type: Option<String>,
    /// Replacement weight, when supplied.
    #[schema(value_type = Option<String>, example = "5.0")]
    pub weight: Option<Decimal>,
    /// Replacement shipping date, when supplied.
    pub shipping_date: Option<NaiveDate>,
}

/// Reference to the carrying truck.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CarrierRef {
    /// Truck id.
    pub id: String,
    /// Canonical link to the truck.
    #[serde(rename = "self")]
    pub self_link: String,
}

/// Wire representation of a package.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PackageResponse {
    /// Package id.
    pub id: String,
    /// Free-form shipping type.
    pub shipping_type: String,
    /// Exact decimal weight.
    #[schema(value_type = String, example = "5.0")]
    pub weight: Decimal,
    /// Calendar shipping date.
    pub shipping_date: NaiveDate,
    /// Carrying truck, absent while unassigned.
    pub carrier: Option<CarrierRef>,
    /// Canonical link to this package.
    #[serde(rename = "self")]
    pub self_link: String,
}

impl PackageResponse {
    fn from_entity(package: &Package, base: &str) -> Self {
        let id = package.id().map_or_else(String::new, |id| id.to_string());
        let self_link = package
            .id()
            .map_or_else(String::new, |id| package_link(base, id));
        Self {
            id,
            shipping_type: package.shipping_type().to_owned(),
            weight: package.weight(),
            shipping_date: package.shipping_date(),
            carrier: package.carrier_id().map(|truck_id| CarrierRef {
                id: truck_id.to_string(),
                self_link: truck_link(base, truck_id),
            }),
            self_link,
        }
    }
}

/// One page of packages plus the `next` link.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PackageListResponse {
    /// Packages on this page.
    pub packages: Vec<PackageResponse>,
    /// Link to the next page, absent on the final page.
    pub next: Option<String>,
}

fn parse_package_id(raw: &str) -> Result<PackageId, Error> {
    raw.parse().map_err(|_| Error::not_found(NO_PACKAGE))
}

/// Register a package.
#[utoipa::path(
    post,
    path = "/packages",
    request_body = CreatePackageRequest,
    responses(
        (status = 201, description = "Package created", body = PackageResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 406, description = "Not acceptable", body = Error),
        (status = 415, description = "Unsupported media type", body = Error)
    ),
    tags = ["packages"],
    operation_id = "createPackage"
)]
#[post("")]
pub async fn create_package(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<CreatePackageRequest>,
) -> ApiResult<HttpResponse> {
    require_json_accept(&req)?;
    let base = request_base(&req);
    let body = payload.into_inner();

    let id = state
        .packages()
        .create_package(body.shipping_type.clone(), body.weight, body.shipping_date)
        .await?;

    let response = PackageResponse {
        id: id.to_string(),
        shipping_type: body.shipping_type,
        weight: body.weight,
        shipping_date: body.shipping_date,
        carrier: None,
        self_link: package_link(&base, id),
    };
    Ok(HttpResponse::Created().json(response))
}

/// List every package, paged.
#[utoipa::path(
    get,
    path = "/packages",
    params(PageQuery),
    responses(
        (status = 200, description = "Packages", body = PackageListResponse),
        (status = 406, description = "Not acceptable", body = Error)
    ),
    tags = ["packages"],
    operation_id = "listPackages"
)]
#[get("")]
pub async fn list_packages(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    require_json_accept(&req)?;
    let base = request_base(&req);
    let page_request = query.into_inner().page_request()?;

    let page = state.packages().get_packages(page_request).await?;
    let (items, has_more) = page.into_parts();

    let next = collection_url(&base, "packages")
        .and_then(|url| pagination::next_link(&url, &page_request, has_more));
    let response = PackageListResponse {
        packages: items
            .iter()
            .map(|package| PackageResponse::from_entity(package, &base))
            .collect(),
        next,
    };
    Ok(HttpResponse::Ok().json(response))
}

/// Fetch one package.
#[utoipa::path(
    get,
    path = "/packages/{package_id}",
    responses(
        (status = 200, description = "The package", body = PackageResponse),
        (status = 404, description = "No such package", body = Error),
        (status = 406, description = "Not acceptable", body = Error)
    ),
    tags = ["packages"],
    operation_id = "getPackage"
)]
#[get("/{package_id}")]
pub async fn get_package(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    require_json_accept(&req)?;
    let id = parse_package_id(&path)?;
    let Some(package) = state.packages().get_package(id).await? else {
        return Err(Error::not_found(NO_PACKAGE));
    };
    let base = request_base(&req);
    Ok(HttpResponse::Ok().json(PackageResponse::from_entity(&package, &base)))
}

/// Partially update one package.
#[utoipa::path(
    patch,
    path = "/packages/{package_id}",
    request_body = UpdatePackageRequest,
    responses(
        (status = 200, description = "Updated package", body = PackageResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "No such package", body = Error)
    ),
    tags = ["packages"],
    operation_id = "editPackage"
)]
#[patch("/{package_id}")]
pub async fn edit_package(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<UpdatePackageRequest>,
) -> ApiResult<HttpResponse> {
    require_json_accept(&req)?;
    let id = parse_package_id(&path)?;

    let body = payload.into_inner();
    let patch = PackagePatch {
        shipping_type: body.shipping_type,
        weight: body.weight,
        shipping_date: body.shipping_date,
        clear_carrier: false,
    };
    let Some(updated) = state.packages().edit_package(id, patch).await? else {
        return Err(Error::not_found(NO_PACKAGE));
    };

    let base = request_base(&req);
    Ok(HttpResponse::Ok().json(PackageResponse::from_entity(&updated, &base)))
}

/// Fully replace one package, detaching it from its carrier.
#[utoipa::path(
    put,
    path = "/packages/{package_id}",
    request_body = CreatePackageRequest,
    responses(
        (status = 303, description = "Replaced; see the canonical resource"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "No such package", body = Error)
    ),
    tags = ["packages"],
    operation_id = "replacePackage"
)]
#[put("/{package_id}")]
pub async fn replace_package(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<CreatePackageRequest>,
) -> ApiResult<HttpResponse> {
    require_json_accept(&req)?;
    let id = parse_package_id(&path)?;

    let body = payload.into_inner();
    let patch = PackagePatch {
        shipping_type: Some(body.shipping_type),
        weight: Some(body.weight),
        shipping_date: Some(body.shipping_date),
        clear_carrier: true,
    };
    if state.packages().edit_package(id, patch).await?.is_none() {
        return Err(Error::not_found(NO_PACKAGE));
    }

    let base = request_base(&req);
    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, package_link(&base, id)))
        .finish())
}

/// Delete one package, unloading it from its carrier.
#[utoipa::path(
    delete,
    path = "/packages/{package_id}",
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such package", body = Error)
    ),
    tags = ["packages"],
    operation_id = "deletePackage"
)]
#[delete("/{package_id}")]
pub async fn delete_package(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_package_id(&path)?;
    if state.packages().delete_package(id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(Error::not_found(NO_PACKAGE))
    }
}
