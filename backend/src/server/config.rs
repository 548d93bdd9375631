//! Runtime configuration loaded via OrthoConfig.
//!
//! Values come from `TRUCKS_*` environment variables, CLI flags, or a config
//! file, merged by OrthoConfig. Everything is optional: without an identity
//! provider the server falls back to the fixture verifier, which is only
//! suitable for development.

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Application settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRUCKS")]
pub struct AppConfig {
    /// Interface to bind; defaults to `0.0.0.0`.
    pub bind_address: Option<String>,
    /// Port to bind; defaults to 8080.
    pub port: Option<u16>,
    /// Identity provider domain for JWKS discovery, e.g. `tenant.auth0.com`.
    pub auth_domain: Option<String>,
    /// Expected token audience.
    pub auth_audience: Option<String>,
}

impl AppConfig {
    /// Load settings from the environment and CLI.
    ///
    /// # Errors
    /// Propagates OrthoConfig's merge/parse failures.
    pub fn from_env() -> ortho_config::OrthoResult<Self> {
        Self::load()
    }

    /// Interface to bind.
    #[must_use]
    pub fn bind_address(&self) -> &str {
        self.bind_address.as_deref().unwrap_or("0.0.0.0")
    }

    /// Port to bind.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(8080)
    }

    /// Identity provider domain and audience, when both are configured.
    #[must_use]
    pub fn auth(&self) -> Option<(&str, &str)> {
        match (self.auth_domain.as_deref(), self.auth_audience.as_deref()) {
            (Some(domain), Some(audience)) => Some((domain, audience)),
            _ => None,
        }
    }
}
