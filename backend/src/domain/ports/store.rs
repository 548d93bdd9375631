//! Port contract for the transactional key-value store collaborator.
//!
//! The store shelves JSON records by entity kind and numeric id, assigns ids
//! server-side, and scopes all mutation behind explicit transactions.
//! Mutations are staged against the open transaction and applied atomically
//! at commit; reads always observe committed state, never the write buffer.
//! Dropping an uncommitted transaction discards its staged writes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Entity kinds the store shelves records under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Registered trucks.
    Trucks,
    /// Shippable packages.
    Packages,
    /// Truck manager accounts.
    Managers,
}

impl EntityKind {
    /// Stable shelf name used by adapters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trucks => "trucks",
            Self::Packages => "packages",
            Self::Managers => "managers",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store-assigned record identifier.
///
/// Identifiers are allocated by the store at insert time and are never
/// reused, even when the allocating transaction rolls back.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Wrap a raw store identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// The raw identifier value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Failures surfaced by the store collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or a transaction could not open.
    #[error("store unavailable: {message}")]
    Unavailable { message: String },

    /// A read, write, or commit failed during execution.
    #[error("store operation failed: {message}")]
    Backend { message: String },

    /// A record could not be serialised or deserialised.
    #[error("record serialisation failed: {message}")]
    Serialization { message: String },

    /// An operation was issued against a committed or rolled-back
    /// transaction.
    #[error("transaction is no longer active")]
    TransactionFinished,
}

impl StoreError {
    /// Create an unavailability error with the given message.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create an execution error with the given message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Create a serialisation error with the given message.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

/// One page of raw records plus the continuation indicator.
///
/// `has_more` reflects the store cursor's continuation probe, not a count of
/// the remaining rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPage {
    /// Records on this page, in the store's stable ascending-id order.
    pub records: Vec<(RecordId, Value)>,
    /// Whether the cursor reported a continuation beyond this page.
    pub has_more: bool,
}

/// A single open transaction against the store.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Allocate a fresh identifier and stage the record under it.
    ///
    /// The identifier is handed out immediately so callers learn it before
    /// commit; the record itself only becomes visible once the transaction
    /// commits.
    async fn insert(&mut self, kind: EntityKind, record: Value) -> Result<RecordId, StoreError>;

    /// Stage a keyed write at an existing identifier.
    ///
    /// # Errors
    /// Returns [`StoreError::TransactionFinished`] after commit or rollback.
    fn upsert(&mut self, kind: EntityKind, id: RecordId, record: Value) -> Result<(), StoreError>;

    /// Stage a keyed delete.
    ///
    /// # Errors
    /// Returns [`StoreError::TransactionFinished`] after commit or rollback.
    fn delete(&mut self, kind: EntityKind, id: RecordId) -> Result<(), StoreError>;

    /// Point lookup of committed state, bypassing the write buffer.
    ///
    /// Absence is reported as `Ok(None)`, never as an error.
    async fn fetch(&self, kind: EntityKind, id: RecordId) -> Result<Option<Value>, StoreError>;

    /// Paged read of committed state in stable store order.
    async fn fetch_page(
        &self,
        kind: EntityKind,
        limit: u32,
        offset: u32,
    ) -> Result<RecordPage, StoreError>;

    /// Indexed equality query over a top-level record field.
    async fn find_eq(
        &self,
        kind: EntityKind,
        field: &str,
        value: &Value,
    ) -> Result<Vec<(RecordId, Value)>, StoreError>;

    /// Apply every staged mutation atomically.
    ///
    /// Consuming the transaction makes a second commit unrepresentable.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    /// Abort the transaction, discarding staged writes.
    ///
    /// Idempotent: checks the in-progress status first, so calling it after
    /// commit or a previous rollback is a safe no-op.
    fn rollback(&mut self);

    /// Whether the transaction can still stage work.
    fn is_active(&self) -> bool;
}

/// Factory half of the store collaborator.
#[async_trait]
pub trait TransactionalStore: Send + Sync {
    /// Open a new transaction.
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError>;
}
