//! Identifier newtypes shared across the domain.
//!
//! Truck, package, and manager identities wrap the store's numeric record
//! ids; an entity built in memory has no identity until persisted. The
//! external auth subject is a validated opaque string, never a record id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::ports::RecordId;

/// Failure parsing an identifier from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identifier must be a base-10 integer")]
pub struct ParseIdError;

/// Stable truck identifier assigned by the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TruckId(i64);

impl TruckId {
    /// Wrap a raw identifier value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// The raw identifier value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// The store record id this identity corresponds to.
    #[must_use]
    pub const fn record(self) -> RecordId {
        RecordId::new(self.0)
    }
}

impl From<RecordId> for TruckId {
    fn from(value: RecordId) -> Self {
        Self(value.value())
    }
}

impl fmt::Display for TruckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TruckId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self).map_err(|_| ParseIdError)
    }
}

/// Stable package identifier assigned by the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PackageId(i64);

impl PackageId {
    /// Wrap a raw identifier value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// The raw identifier value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// The store record id this identity corresponds to.
    #[must_use]
    pub const fn record(self) -> RecordId {
        RecordId::new(self.0)
    }
}

impl From<RecordId> for PackageId {
    fn from(value: RecordId) -> Self {
        Self(value.value())
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PackageId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self).map_err(|_| ParseIdError)
    }
}

/// Stable truck manager identifier assigned by the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ManagerId(i64);

impl ManagerId {
    /// Wrap a raw identifier value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// The raw identifier value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// The store record id this identity corresponds to.
    #[must_use]
    pub const fn record(self) -> RecordId {
        RecordId::new(self.0)
    }
}

impl From<RecordId> for ManagerId {
    fn from(value: RecordId) -> Self {
        Self(value.value())
    }
}

impl fmt::Display for ManagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ManagerId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self).map_err(|_| ParseIdError)
    }
}

/// Validation errors returned by [`AuthId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthIdError {
    /// The subject string was empty or whitespace.
    #[error("auth subject must not be empty")]
    Empty,
}

/// External identity-provider subject (`sub` claim).
///
/// Immutable once a manager record is created; the value is opaque to this
/// service and is never interpreted beyond equality.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct AuthId(String);

impl AuthId {
    /// Validate and construct an [`AuthId`].
    ///
    /// # Errors
    /// Returns [`AuthIdError::Empty`] when the subject is blank.
    pub fn new(subject: impl Into<String>) -> Result<Self, AuthIdError> {
        let subject = subject.into();
        if subject.trim().is_empty() {
            return Err(AuthIdError::Empty);
        }
        Ok(Self(subject))
    }

    /// The raw subject string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for AuthId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AuthId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl TryFrom<String> for AuthId {
    type Error = AuthIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AuthId> for String {
    fn from(value: AuthId) -> Self {
        value.0
    }
}
