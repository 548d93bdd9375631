//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memstore**: in-process implementation of the transactional store port
//! - **jwks**: RS256 JWKS-backed implementation of the token verifier port
//!
//! Adapters are thin translators between domain contracts and infrastructure
//! representations; they contain no business logic.

pub mod jwks;
pub mod memstore;

pub use jwks::{Jwk, Jwks, JwksError, JwksVerifier};
pub use memstore::MemoryStore;
