//! Backend entry-point: configuration, store, verifier, HTTP server.

use std::sync::Arc;

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::domain::ports::{FixtureTokenVerifier, TokenVerifier};
use backend::outbound::{JwksVerifier, MemoryStore};
use backend::server::{self, AppConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env().map_err(|err| std::io::Error::other(err.to_string()))?;

    let verifier: Arc<dyn TokenVerifier> = match config.auth() {
        Some((domain, audience)) => {
            let client = reqwest::Client::new();
            let jwks = JwksVerifier::fetch_jwks(&client, domain)
                .await
                .map_err(|err| std::io::Error::other(err.to_string()))?;
            let issuer = format!("https://{domain}/");
            let verifier = JwksVerifier::new(&jwks, audience, &issuer)
                .map_err(|err| std::io::Error::other(err.to_string()))?;
            Arc::new(verifier)
        }
        None => {
            warn!("no identity provider configured; accepting fixture tokens (dev only)");
            Arc::new(FixtureTokenVerifier)
        }
    };

    let store = Arc::new(MemoryStore::new());
    server::run(config, store, verifier).await
}
