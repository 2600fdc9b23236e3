//! Domain error model.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every rejection carries a stable machine-readable kind; policy rejections
/// (`DuplicateSubmission`, `LockedOut`) additionally carry the retry-hint data
/// callers need. Infrastructure failures are folded into `Internal` at the
/// boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or out-of-bounds input. Caller error, never retried.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Missing or invalid caller identity.
    #[error("unauthenticated")]
    Unauthenticated,

    /// A repeat submission with identical key attributes within the cooldown
    /// window.
    #[error("duplicate submission within {window_secs}s window")]
    DuplicateSubmission {
        /// Cooldown window that was violated, in seconds.
        window_secs: i64,
    },

    /// Authentication attempts for this identifier are temporarily rejected.
    #[error("locked out until {locked_until} ({remaining_minutes} minutes remaining)")]
    LockedOut {
        locked_until: DateTime<Utc>,
        remaining_minutes: i64,
    },

    /// The account record did not exist at transaction start.
    #[error("account not found")]
    AccountNotFound,

    /// The account balance could not cover the requested cost.
    #[error("insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: u64, required: u64 },

    /// The transaction retry budget was exhausted on write conflicts.
    /// Transient; safe to retry from the caller side.
    #[error("transaction contention after {attempts} attempts")]
    Contention { attempts: u32 },

    /// Generic internal failure (store errors, serialization, ...).
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Durable-store operation error.
///
/// The store is an external collaborator; anything that goes wrong talking to
/// it is surfaced here and mapped to `DomainError::Internal` at the boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::Internal(err.to_string())
    }
}
