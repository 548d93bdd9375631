//! HTTP surface tests with the fixture verifier and in-process store.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test, web};
use serde_json::{Value, json};

use backend::domain::ports::{FixtureTokenVerifier, TokenVerifier, TransactionalStore};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::{self, AppState};
use backend::outbound::MemoryStore;

fn test_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let store: Arc<dyn TransactionalStore> = Arc::new(MemoryStore::new());
    let verifier: Arc<dyn TokenVerifier> = Arc::new(FixtureTokenVerifier);
    App::new()
        .app_data(web::Data::new(AppState::new(store, verifier)))
        .app_data(web::Data::new(HealthState::new()))
        .configure(http::configure)
}

fn bearer(subject: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer fixture:{subject}"))
}

async fn read_json(response: actix_web::dev::ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}

async fn create_truck<S>(app: &S, subject: &str, truck_type: &str) -> Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let request = actix_test::TestRequest::post()
        .uri("/trucks")
        .insert_header(bearer(subject))
        .set_json(json!({ "type": truck_type, "length": 20, "axles": 2 }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await
}

async fn create_package<S>(app: &S) -> Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let request = actix_test::TestRequest::post()
        .uri("/packages")
        .set_json(json!({
            "shipping_type": "overnight",
            "weight": "5.0",
            "shipping_date": "2022-06-25"
        }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await
}

#[actix_web::test]
async fn truck_routes_require_a_bearer_token() {
    let app = actix_test::init_service(test_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/trucks")
        .set_json(json!({ "type": "Box truck", "length": 20, "axles": 2 }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(response).await;
    assert_eq!(body["code"], "no_auth_header");
    assert_eq!(body["description"], "Authorization header is missing");
}

#[actix_web::test]
async fn created_trucks_echo_the_wire_shape() {
    let app = actix_test::init_service(test_app()).await;
    let body = create_truck(&app, "auth0|abc123", "Box truck").await;

    assert!(!body["id"].as_str().expect("id is text").is_empty());
    assert_eq!(body["type"], "Box truck");
    assert_eq!(body["length"], 20);
    assert_eq!(body["axles"], 2);
    assert_eq!(body["owner"], "auth0|abc123");
    assert_eq!(body["packages"], json!([]));
    assert!(
        body["self"]
            .as_str()
            .expect("self link is text")
            .contains("/trucks/")
    );
}

#[actix_web::test]
async fn missing_required_fields_are_rejected() {
    let app = actix_test::init_service(test_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/trucks")
        .insert_header(bearer("auth0|abc123"))
        .set_json(json!({ "type": "Box truck", "length": 20 }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn truck_listing_is_owner_scoped_and_paged() {
    let app = actix_test::init_service(test_app()).await;
    for n in 0..6 {
        create_truck(&app, "auth0|abc123", &format!("mine-{n}")).await;
    }
    create_truck(&app, "auth0|other", "theirs").await;

    let request = actix_test::TestRequest::get()
        .uri("/trucks")
        .insert_header(bearer("auth0|abc123"))
        .to_request();
    let body = read_json(actix_test::call_service(&app, request).await).await;
    assert_eq!(body["trucks"].as_array().expect("array").len(), 5);
    assert!(
        body["next"]
            .as_str()
            .expect("next link present")
            .contains("/trucks?limit=5&offset=5")
    );

    let request = actix_test::TestRequest::get()
        .uri("/trucks?limit=5&offset=5")
        .insert_header(bearer("auth0|abc123"))
        .to_request();
    let body = read_json(actix_test::call_service(&app, request).await).await;
    assert_eq!(body["trucks"].as_array().expect("array").len(), 1);
    assert!(body["next"].is_null());

    let request = actix_test::TestRequest::get()
        .uri("/trucks")
        .insert_header(bearer("auth0|other"))
        .to_request();
    let body = read_json(actix_test::call_service(&app, request).await).await;
    assert_eq!(body["trucks"].as_array().expect("array").len(), 1);
    assert_eq!(body["trucks"][0]["type"], "theirs");
}

#[actix_web::test]
async fn foreign_trucks_are_forbidden() {
    let app = actix_test::init_service(test_app()).await;
    let truck = create_truck(&app, "auth0|abc123", "Box truck").await;
    let id = truck["id"].as_str().expect("id");

    let request = actix_test::TestRequest::get()
        .uri(&format!("/trucks/{id}"))
        .insert_header(bearer("auth0|other"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn packages_round_trip_exact_decimal_text() {
    let app = actix_test::init_service(test_app()).await;
    let created = create_package(&app).await;
    assert_eq!(created["weight"], "5.0");
    assert_eq!(created["shipping_date"], "2022-06-25");
    assert_eq!(created["carrier"], Value::Null);
    let id = created["id"].as_str().expect("id").to_owned();

    let request = actix_test::TestRequest::get()
        .uri(&format!("/packages/{id}"))
        .to_request();
    let body = read_json(actix_test::call_service(&app, request).await).await;
    assert_eq!(body["weight"], "5.0");

    let request = actix_test::TestRequest::patch()
        .uri(&format!("/packages/{id}"))
        .set_json(json!({ "weight": "7.25" }))
        .to_request();
    let body = read_json(actix_test::call_service(&app, request).await).await;
    assert_eq!(body["weight"], "7.25");
    assert_eq!(body["shipping_type"], "overnight");
}

#[actix_web::test]
async fn unknown_fields_on_partial_updates_are_rejected() {
    let app = actix_test::init_service(test_app()).await;
    let created = create_package(&app).await;
    let id = created["id"].as_str().expect("id").to_owned();

    let request = actix_test::TestRequest::patch()
        .uri(&format!("/packages/{id}"))
        .set_json(json!({ "weight": "7.25", "carrier": 7 }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn non_json_bodies_are_unsupported_media() {
    let app = actix_test::init_service(test_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/packages")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload("weight: heavy")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[actix_web::test]
async fn unacceptable_accept_headers_are_406() {
    let app = actix_test::init_service(test_app()).await;

    let request = actix_test::TestRequest::get()
        .uri("/packages")
        .insert_header((header::ACCEPT, "text/html"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
}

#[actix_web::test]
async fn assignment_round_trip_and_conflict() {
    let app = actix_test::init_service(test_app()).await;
    let truck = create_truck(&app, "auth0|abc123", "Box truck").await;
    let other = create_truck(&app, "auth0|abc123", "Flatbed").await;
    let package = create_package(&app).await;
    let truck_id = truck["id"].as_str().expect("id").to_owned();
    let other_id = other["id"].as_str().expect("id").to_owned();
    let package_id = package["id"].as_str().expect("id").to_owned();

    let request = actix_test::TestRequest::put()
        .uri(&format!("/trucks/{truck_id}/packages/{package_id}"))
        .insert_header(bearer("auth0|abc123"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = actix_test::TestRequest::get()
        .uri(&format!("/trucks/{truck_id}"))
        .insert_header(bearer("auth0|abc123"))
        .to_request();
    let body = read_json(actix_test::call_service(&app, request).await).await;
    assert_eq!(body["packages"][0]["id"], package_id.as_str());

    let request = actix_test::TestRequest::put()
        .uri(&format!("/trucks/{other_id}/packages/{package_id}"))
        .insert_header(bearer("auth0|abc123"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let request = actix_test::TestRequest::delete()
        .uri(&format!("/trucks/{truck_id}/packages/{package_id}"))
        .insert_header(bearer("auth0|abc123"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = actix_test::TestRequest::delete()
        .uri(&format!("/trucks/{truck_id}/packages/{package_id}"))
        .insert_header(bearer("auth0|abc123"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn replace_truck_clears_packages_and_redirects() {
    let app = actix_test::init_service(test_app()).await;
    let truck = create_truck(&app, "auth0|abc123", "Box truck").await;
    let package = create_package(&app).await;
    let truck_id = truck["id"].as_str().expect("id").to_owned();
    let package_id = package["id"].as_str().expect("id").to_owned();

    let request = actix_test::TestRequest::put()
        .uri(&format!("/trucks/{truck_id}/packages/{package_id}"))
        .insert_header(bearer("auth0|abc123"))
        .to_request();
    actix_test::call_service(&app, request).await;

    let request = actix_test::TestRequest::put()
        .uri(&format!("/trucks/{truck_id}"))
        .insert_header(bearer("auth0|abc123"))
        .set_json(json!({ "type": "Reefer", "length": 28, "axles": 3 }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .expect("ascii");
    assert!(location.ends_with(&format!("/trucks/{truck_id}")));

    let request = actix_test::TestRequest::get()
        .uri(&format!("/trucks/{truck_id}"))
        .insert_header(bearer("auth0|abc123"))
        .to_request();
    let body = read_json(actix_test::call_service(&app, request).await).await;
    assert_eq!(body["type"], "Reefer");
    assert_eq!(body["packages"], json!([]));

    let request = actix_test::TestRequest::get()
        .uri(&format!("/packages/{package_id}"))
        .to_request();
    let body = read_json(actix_test::call_service(&app, request).await).await;
    assert_eq!(body["carrier"], Value::Null);
}

#[actix_web::test]
async fn deleting_a_missing_package_is_404() {
    let app = actix_test::init_service(test_app()).await;
    let request = actix_test::TestRequest::delete()
        .uri("/packages/4040")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn manager_registration_replays_instead_of_duplicating() {
    let app = actix_test::init_service(test_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/truckmanagers")
        .insert_header(bearer("auth0|abc123"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let first = read_json(response).await;

    let request = actix_test::TestRequest::post()
        .uri("/truckmanagers")
        .insert_header(bearer("auth0|abc123"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let second = read_json(response).await;
    assert_eq!(first["id"], second["id"]);

    let request = actix_test::TestRequest::get()
        .uri("/truckmanagers")
        .to_request();
    let body = read_json(actix_test::call_service(&app, request).await).await;
    let users = body["users"].as_array().expect("array");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["auth_id"], "auth0|abc123");
}

#[actix_web::test]
async fn manager_listing_reflects_derived_truck_ownership() {
    let app = actix_test::init_service(test_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/truckmanagers")
        .insert_header(bearer("auth0|abc123"))
        .to_request();
    actix_test::call_service(&app, request).await;
    let truck = create_truck(&app, "auth0|abc123", "Box truck").await;

    let request = actix_test::TestRequest::get()
        .uri("/truckmanagers")
        .to_request();
    let body = read_json(actix_test::call_service(&app, request).await).await;
    assert_eq!(body["users"][0]["trucks"][0]["id"], truck["id"]);
}
