//! Authentication failure taxonomy.
//!
//! Credential verification happens in an outbound adapter; the domain only
//! names the closed set of ways it can fail. Every kind carries a fixed
//! `{code, description}` payload and maps to HTTP 401 at the boundary,
//! surfaced verbatim without being caught by the core.

use serde::{Serialize, Serializer, ser::SerializeStruct};

/// The closed set of authentication failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    /// No `Authorization` header was supplied.
    MissingHeader,
    /// The header was present but not a usable bearer credential.
    MalformedHeader,
    /// The token is signed with an algorithm other than RS256.
    WrongAlgorithm,
    /// The token's signature key is valid but the token has expired.
    TokenExpired,
    /// The token verified but its audience or issuer claims are wrong.
    InvalidClaims,
    /// No verification key in the JWKS matches the token's key id.
    NoMatchingKey,
    /// The token could not be parsed or its signature did not verify.
    InvalidToken,
}

impl AuthErrorKind {
    /// Stable machine-readable failure code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingHeader => "no_auth_header",
            Self::MalformedHeader | Self::WrongAlgorithm => "invalid_header",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims => "invalid_claims",
            Self::NoMatchingKey => "no_rsa_key",
            Self::InvalidToken => "invalid_token",
        }
    }

    /// Fixed human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::MissingHeader => "Authorization header is missing",
            Self::MalformedHeader | Self::WrongAlgorithm => {
                "Invalid header. Use an RS256 signed JWT Access Token"
            }
            Self::TokenExpired => "token is expired",
            Self::InvalidClaims => "incorrect claims, please check the audience and issuer",
            Self::NoMatchingKey => "No RSA key in JWKS",
            Self::InvalidToken => "Unable to parse authentication token.",
        }
    }
}

/// Authentication failure with its fixed wire payload.
///
/// Serialises as `{"code": ..., "description": ...}` — the exact body the
/// boundary returns alongside status 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{}", .kind.description())]
pub struct AuthError {
    kind: AuthErrorKind,
}

impl AuthError {
    /// Wrap a failure kind.
    #[must_use]
    pub const fn new(kind: AuthErrorKind) -> Self {
        Self { kind }
    }

    /// The failure kind.
    #[must_use]
    pub const fn kind(self) -> AuthErrorKind {
        self.kind
    }

    /// Fixed HTTP status for every authentication failure.
    #[must_use]
    pub const fn status(self) -> u16 {
        401
    }
}

impl From<AuthErrorKind> for AuthError {
    fn from(kind: AuthErrorKind) -> Self {
        Self::new(kind)
    }
}

impl Serialize for AuthError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut body = serializer.serialize_struct("AuthError", 2)?;
        body.serialize_field("code", self.kind.code())?;
        body.serialize_field("description", self.kind.description())?;
        body.end()
    }
}
