//! Bearer-claims extraction for protected handlers.
//!
//! Handlers declare [`BearerClaims`] as an argument; extraction parses the
//! `Authorization` header and delegates verification to the configured
//! token verifier port. Failures surface as the fixed 401 payloads of the
//! authentication taxonomy without touching the handler body.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};

use crate::domain::auth::{AuthError, AuthErrorKind};
use crate::domain::ids::AuthId;
use crate::domain::ports::{TokenVerifier, VerifiedClaims};
use crate::inbound::http::state::AppState;

/// Verified claims of the requesting subject.
#[derive(Debug, Clone)]
pub struct BearerClaims(VerifiedClaims);

impl BearerClaims {
    /// External auth subject of the caller.
    #[must_use]
    pub const fn sub(&self) -> &AuthId {
        self.0.sub()
    }

    /// Consume the claims into the subject.
    #[must_use]
    pub fn into_sub(self) -> AuthId {
        self.0.into_sub()
    }
}

/// Parse the `Authorization` header and verify the bearer token.
///
/// # Errors
/// Returns the matching [`AuthError`] kind for a missing or malformed
/// header, or whatever failure the verifier reports for the token itself.
pub fn authenticate(
    req: &HttpRequest,
    verifier: &dyn TokenVerifier,
) -> Result<VerifiedClaims, AuthError> {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return Err(AuthError::new(AuthErrorKind::MissingHeader));
    };
    let value = value
        .to_str()
        .map_err(|_| AuthError::new(AuthErrorKind::MalformedHeader))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::new(AuthErrorKind::MalformedHeader))?;
    verifier.verify(token.trim())
}

impl FromRequest for BearerClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            return ready(Err(actix_web::error::ErrorInternalServerError(
                "application state is not configured",
            )));
        };
        ready(
            authenticate(req, state.verifier())
                .map(Self)
                .map_err(actix_web::Error::from),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    use crate::domain::ports::FixtureTokenVerifier;

    #[rstest]
    fn missing_header_is_its_own_failure_kind() {
        let req = TestRequest::default().to_http_request();
        let err = authenticate(&req, &FixtureTokenVerifier).expect_err("rejected");
        assert_eq!(err.kind(), AuthErrorKind::MissingHeader);
    }

    #[rstest]
    #[case("Token abc")]
    #[case("Bearer")]
    fn non_bearer_headers_are_malformed(#[case] value: &str) {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, value))
            .to_http_request();
        let err = authenticate(&req, &FixtureTokenVerifier).expect_err("rejected");
        assert_eq!(err.kind(), AuthErrorKind::MalformedHeader);
    }

    #[rstest]
    fn verified_tokens_yield_the_subject() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer fixture:auth0|abc123"))
            .to_http_request();
        let claims = authenticate(&req, &FixtureTokenVerifier).expect("verified");
        assert_eq!(claims.sub().as_str(), "auth0|abc123");
    }
}
