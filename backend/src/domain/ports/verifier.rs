//! Driving port for bearer-token verification.
//!
//! Inbound adapters hand the raw token to this port and receive verified
//! claims without knowing the verification backend. Handler tests substitute
//! the fixture implementation instead of minting real signatures.

use crate::domain::auth::{AuthError, AuthErrorKind};
use crate::domain::ids::AuthId;

/// Claims extracted from a successfully verified credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    sub: AuthId,
}

impl VerifiedClaims {
    /// Wrap the verified subject.
    #[must_use]
    pub const fn new(sub: AuthId) -> Self {
        Self { sub }
    }

    /// External auth subject (`sub` claim).
    #[must_use]
    pub const fn sub(&self) -> &AuthId {
        &self.sub
    }

    /// Consume the claims into the subject.
    #[must_use]
    pub fn into_sub(self) -> AuthId {
        self.sub
    }
}

/// Verify a bearer token into claims, or report the failure kind.
pub trait TokenVerifier: Send + Sync {
    /// Verify the raw token text.
    ///
    /// # Errors
    /// Returns the [`AuthError`] kind describing why verification failed.
    fn verify(&self, token: &str) -> Result<VerifiedClaims, AuthError>;
}

/// Test/dev verifier accepting tokens of the form `fixture:<subject>`.
///
/// Anything else is rejected as an unparseable token, which keeps negative
/// paths exercisable without a signing key.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTokenVerifier;

impl TokenVerifier for FixtureTokenVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedClaims, AuthError> {
        let subject = token
            .strip_prefix("fixture:")
            .ok_or(AuthError::new(AuthErrorKind::InvalidToken))?;
        let sub =
            AuthId::new(subject).map_err(|_| AuthError::new(AuthErrorKind::InvalidClaims))?;
        Ok(VerifiedClaims::new(sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::AuthErrorKind;
    use rstest::rstest;

    #[rstest]
    fn fixture_verifier_accepts_prefixed_subjects() {
        let claims = FixtureTokenVerifier
            .verify("fixture:auth0|abc123")
            .expect("verifies");
        assert_eq!(claims.sub().as_str(), "auth0|abc123");
    }

    #[rstest]
    #[case("eyJhbGciOiJSUzI1NiJ9.payload.sig", AuthErrorKind::InvalidToken)]
    #[case("fixture:", AuthErrorKind::InvalidClaims)]
    fn fixture_verifier_rejects_everything_else(
        #[case] token: &str,
        #[case] kind: AuthErrorKind,
    ) {
        let err = FixtureTokenVerifier.verify(token).expect_err("rejected");
        assert_eq!(err.kind(), kind);
    }
}
