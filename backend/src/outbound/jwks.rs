//! RS256 JWKS-backed implementation of the token verifier port.
//!
//! The JWKS document is fetched once at startup and parsed into decoding
//! keys indexed by key id. Verification itself is synchronous and maps every
//! failure onto the domain's closed authentication taxonomy.

use std::collections::HashMap;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use tracing::debug;

use crate::domain::auth::{AuthError, AuthErrorKind};
use crate::domain::ids::AuthId;
use crate::domain::ports::{TokenVerifier, VerifiedClaims};

/// One verification key from the provider's JWKS document.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    /// Key type; only `RSA` keys participate in verification.
    pub kty: String,
    /// Key id matched against token headers.
    pub kid: String,
    /// RSA modulus, base64url.
    pub n: String,
    /// RSA exponent, base64url.
    pub e: String,
}

/// The provider's key set document.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwks {
    /// Published verification keys.
    pub keys: Vec<Jwk>,
}

/// Failures building or fetching a verifier.
#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    /// A published RSA key could not be parsed into a decoding key.
    #[error("JWKS key {kid} is unusable: {message}")]
    BadKey { kid: String, message: String },

    /// The JWKS document could not be fetched.
    #[error("failed to fetch JWKS document: {message}")]
    Fetch { message: String },
}

#[derive(Debug, Deserialize)]
struct ClaimsDto {
    sub: String,
}

/// Token verifier backed by a parsed JWKS document.
pub struct JwksVerifier {
    keys: HashMap<String, DecodingKey>,
    validation: Validation,
}

impl JwksVerifier {
    /// Build a verifier from a key set, pinning audience and issuer.
    ///
    /// # Errors
    /// Returns [`JwksError::BadKey`] when a published RSA key cannot be
    /// parsed.
    pub fn new(jwks: &Jwks, audience: &str, issuer: &str) -> Result<Self, JwksError> {
        let mut keys = HashMap::new();
        for key in &jwks.keys {
            if key.kty != "RSA" {
                debug!(kid = %key.kid, kty = %key.kty, "skipping non-RSA JWKS key");
                continue;
            }
            let decoding_key =
                DecodingKey::from_rsa_components(&key.n, &key.e).map_err(|err| {
                    JwksError::BadKey {
                        kid: key.kid.clone(),
                        message: err.to_string(),
                    }
                })?;
            keys.insert(key.kid.clone(), decoding_key);
        }

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[audience]);
        validation.set_issuer(&[issuer]);
        Ok(Self { keys, validation })
    }

    /// Fetch the provider's JWKS document from its well-known location.
    ///
    /// # Errors
    /// Returns [`JwksError::Fetch`] on transport or decoding failures.
    pub async fn fetch_jwks(client: &reqwest::Client, domain: &str) -> Result<Jwks, JwksError> {
        let url = format!("https://{domain}/.well-known/jwks.json");
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|err| JwksError::Fetch {
                message: err.to_string(),
            })?;
        response.json().await.map_err(|err| JwksError::Fetch {
            message: err.to_string(),
        })
    }
}

impl TokenVerifier for JwksVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedClaims, AuthError> {
        let header =
            decode_header(token).map_err(|_| AuthError::new(AuthErrorKind::MalformedHeader))?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::new(AuthErrorKind::WrongAlgorithm));
        }
        let key = header
            .kid
            .as_deref()
            .and_then(|kid| self.keys.get(kid))
            .ok_or(AuthError::new(AuthErrorKind::NoMatchingKey))?;

        let data = decode::<ClaimsDto>(token, key, &self.validation).map_err(|err| {
            let kind = match err.kind() {
                ErrorKind::ExpiredSignature => AuthErrorKind::TokenExpired,
                ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => {
                    AuthErrorKind::InvalidClaims
                }
                _ => AuthErrorKind::InvalidToken,
            };
            AuthError::new(kind)
        })?;

        let sub = AuthId::new(data.claims.sub)
            .map_err(|_| AuthError::new(AuthErrorKind::InvalidClaims))?;
        Ok(VerifiedClaims::new(sub))
    }
}
