//! Domain ports for the hexagonal boundary.
//!
//! `store` is the driven port every repository writes through; `verifier`
//! is the driving port inbound adapters use to turn bearer tokens into
//! verified claims.

mod store;
mod verifier;

pub use store::{
    EntityKind, RecordId, RecordPage, StoreError, StoreTransaction, TransactionalStore,
};
pub use verifier::{FixtureTokenVerifier, TokenVerifier, VerifiedClaims};
