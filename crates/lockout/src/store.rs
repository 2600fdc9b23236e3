use chrono::{DateTime, Utc};

use devforum_core::StoreError;

use crate::lock::LoginLock;

/// Port to the durable store, as seen by the lockout state machine.
///
/// Lock operations are single-document reads, merge-writes and deletes; none
/// of them is transactional with respect to the others. `merge_failed_attempts`
/// must preserve unrelated fields (in particular `lockedUntil`) and stamp
/// `lastAttemptAt` from the store clock.
pub trait LockStore: Send + Sync {
    /// The store's clock. Lock-expiry comparisons use this, never a
    /// caller-supplied timestamp.
    fn now(&self) -> DateTime<Utc>;

    fn lock(&self, identifier: &str) -> Result<Option<LoginLock>, StoreError>;

    /// Upsert `failedAttempts` and refresh `lastAttemptAt` (server time),
    /// merging with any existing record.
    fn merge_failed_attempts(&self, identifier: &str, failed_attempts: u32)
        -> Result<(), StoreError>;

    fn set_locked_until(
        &self,
        identifier: &str,
        locked_until: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Delete the record; absent records are a no-op.
    fn clear(&self, identifier: &str) -> Result<(), StoreError>;

    /// Delete up to `limit` records whose `lockedUntil` is at or before
    /// `cutoff`, as one batch. Returns the number deleted; an empty result
    /// set is a no-op, not an error.
    fn delete_expired(&self, cutoff: DateTime<Utc>, limit: usize) -> Result<usize, StoreError>;
}

impl<S> LockStore for &S
where
    S: LockStore + ?Sized,
{
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn lock(&self, identifier: &str) -> Result<Option<LoginLock>, StoreError> {
        (**self).lock(identifier)
    }

    fn merge_failed_attempts(
        &self,
        identifier: &str,
        failed_attempts: u32,
    ) -> Result<(), StoreError> {
        (**self).merge_failed_attempts(identifier, failed_attempts)
    }

    fn set_locked_until(
        &self,
        identifier: &str,
        locked_until: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        (**self).set_locked_until(identifier, locked_until)
    }

    fn clear(&self, identifier: &str) -> Result<(), StoreError> {
        (**self).clear(identifier)
    }

    fn delete_expired(&self, cutoff: DateTime<Utc>, limit: usize) -> Result<usize, StoreError> {
        (**self).delete_expired(cutoff, limit)
    }
}

impl<S> LockStore for std::sync::Arc<S>
where
    S: LockStore + ?Sized,
{
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn lock(&self, identifier: &str) -> Result<Option<LoginLock>, StoreError> {
        (**self).lock(identifier)
    }

    fn merge_failed_attempts(
        &self,
        identifier: &str,
        failed_attempts: u32,
    ) -> Result<(), StoreError> {
        (**self).merge_failed_attempts(identifier, failed_attempts)
    }

    fn set_locked_until(
        &self,
        identifier: &str,
        locked_until: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        (**self).set_locked_until(identifier, locked_until)
    }

    fn clear(&self, identifier: &str) -> Result<(), StoreError> {
        (**self).clear(identifier)
    }

    fn delete_expired(&self, cutoff: DateTime<Utc>, limit: usize) -> Result<usize, StoreError> {
        (**self).delete_expired(cutoff, limit)
    }
}
