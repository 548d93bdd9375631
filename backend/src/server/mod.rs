//! Server construction and middleware wiring.

mod config;

pub use config::AppConfig;

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::info;

use crate::domain::ports::{TokenVerifier, TransactionalStore};
use crate::inbound::http::{self, AppState, health::HealthState};
use crate::middleware::Trace;

/// Bind and run the HTTP server until shutdown.
///
/// The store connection and token verifier are constructed once by the
/// caller and injected; the server only wires them into request state.
///
/// # Errors
/// Returns the bind or runtime I/O failure.
pub async fn run(
    config: AppConfig,
    store: Arc<dyn TransactionalStore>,
    verifier: Arc<dyn TokenVerifier>,
) -> std::io::Result<()> {
    let state = web::Data::new(AppState::new(store, verifier));
    let health = web::Data::new(HealthState::new());

    let app_state = state.clone();
    let app_health = health.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(app_health.clone())
            .wrap(Trace)
            .configure(http::configure)
    })
    .bind((config.bind_address(), config.port()))?;

    info!(
        address = config.bind_address(),
        port = config.port(),
        "listening"
    );
    health.mark_ready();
    server.run().await
}
