use devforum_core::StoreError;

use crate::store::LockStore;

/// Sweep policy. One run deletes at most `page_size` records; larger backlogs
/// drain over subsequent scheduled runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPolicy {
    pub page_size: usize,
}

impl Default for SweepPolicy {
    fn default() -> Self {
        Self { page_size: 500 }
    }
}

/// Out-of-band reclamation of lock records whose window has elapsed.
///
/// Storage hygiene only: `check_allowed` judges expiry itself, so live checks
/// stay correct even if the sweeper never runs. Idempotent; an empty page is
/// a no-op.
#[derive(Debug, Clone)]
pub struct LockSweeper<S> {
    store: S,
    policy: SweepPolicy,
}

impl<S: LockStore> LockSweeper<S> {
    pub fn new(store: S, policy: SweepPolicy) -> Self {
        Self { store, policy }
    }

    /// Delete one bounded page of expired locks. Returns the count deleted.
    pub fn sweep(&self) -> Result<usize, StoreError> {
        let now = self.store.now();
        let deleted = self.store.delete_expired(now, self.policy.page_size)?;

        if deleted == 0 {
            tracing::debug!("no expired login locks to clean up");
        } else {
            tracing::info!(deleted, "cleaned up expired login locks");
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{LockoutPolicy, LoginLockout};
    use crate::testsupport::FakeLockStore;

    fn lock_out(store: &FakeLockStore, identifier: &str) {
        let lockout = LoginLockout::new(store, LockoutPolicy::default());
        for _ in 0..5 {
            lockout.record_attempt(identifier, false).unwrap();
        }
        lockout.check_allowed(identifier).unwrap_err();
    }

    #[test]
    fn sweeps_only_expired_locks() {
        let store = FakeLockStore::new();
        lock_out(&store, "expired@example.com");

        store.advance(chrono::Duration::minutes(16));
        lock_out(&store, "active@example.com");

        let sweeper = LockSweeper::new(&store, SweepPolicy::default());
        assert_eq!(sweeper.sweep().unwrap(), 1);
        assert!(store.lock("expired@example.com").unwrap().is_none());
        assert!(store.lock("active@example.com").unwrap().is_some());
    }

    #[test]
    fn second_run_is_a_no_op() {
        let store = FakeLockStore::new();
        lock_out(&store, "expired@example.com");
        store.advance(chrono::Duration::minutes(16));

        let sweeper = LockSweeper::new(&store, SweepPolicy::default());
        assert_eq!(sweeper.sweep().unwrap(), 1);
        assert_eq!(sweeper.sweep().unwrap(), 0);
    }

    #[test]
    fn respects_the_page_bound() {
        let store = FakeLockStore::new();
        for i in 0..7 {
            lock_out(&store, &format!("user{i}@example.com"));
        }
        store.advance(chrono::Duration::minutes(16));

        let sweeper = LockSweeper::new(&store, SweepPolicy { page_size: 5 });
        assert_eq!(sweeper.sweep().unwrap(), 5);
        assert_eq!(sweeper.sweep().unwrap(), 2);
        assert_eq!(sweeper.sweep().unwrap(), 0);
    }

    #[test]
    fn accumulating_records_without_lock_are_kept() {
        let store = FakeLockStore::new();
        let lockout = LoginLockout::new(&store, LockoutPolicy::default());
        lockout.record_attempt("slow@example.com", false).unwrap();

        store.advance(chrono::Duration::hours(2));
        let sweeper = LockSweeper::new(&store, SweepPolicy::default());
        assert_eq!(sweeper.sweep().unwrap(), 0);
        assert!(store.lock("slow@example.com").unwrap().is_some());
    }
}
