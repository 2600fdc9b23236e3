//! Login-attempt rate limiting: per-identifier failure
//! counting, timed lockout, and reclamation of stale lock records.
//!
//! The "lock" here is a logical flag on a store document, not a concurrency
//! primitive. All state lives behind the [`store::LockStore`] port.

pub mod lock;
pub mod service;
pub mod store;
pub mod sweeper;

pub use lock::LoginLock;
pub use service::{LockoutPolicy, LoginLockout};
pub use store::LockStore;
pub use sweeper::{LockSweeper, SweepPolicy};

#[cfg(test)]
pub(crate) mod testsupport;
