use chrono::{DateTime, Utc};

use devforum_core::{DomainError, DomainResult};

use crate::store::LockStore;

/// Lockout policy constants. Configurable; the observed defaults are a
/// 5-failure threshold and a 15-minute lock window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    pub max_failed_attempts: u32,
    pub lock_window: chrono::Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: 5,
            lock_window: chrono::Duration::minutes(15),
        }
    }
}

/// Login lockout state machine, keyed by identifier (email).
///
/// Per identifier: no record (clear) → accumulating failures → locked once
/// the counter reaches the threshold → clear again on success, or admitted
/// once the lock window has passed. Expiry is judged against the store clock
/// at check time; the sweeper only reclaims storage and is not needed for
/// correctness here.
///
/// `check_allowed` and `record_attempt` are deliberately two separate store
/// operations, so two concurrent attempts for one identifier can both pass
/// the check before either records. Acceptable for a brute-force deterrent,
/// not for capacity control.
#[derive(Debug, Clone)]
pub struct LoginLockout<S> {
    store: S,
    policy: LockoutPolicy,
}

impl<S: LockStore> LoginLockout<S> {
    pub fn new(store: S, policy: LockoutPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &LockoutPolicy {
        &self.policy
    }

    /// Consult the state machine before an authentication attempt.
    ///
    /// A still-active lock rejects without any mutation. A counter at or over
    /// the threshold with no lock set yet escalates: the lock window starts
    /// now and the attempt is rejected. An expired lock admits the caller.
    pub fn check_allowed(&self, identifier: &str) -> DomainResult<()> {
        let Some(lock) = self.store.lock(identifier)? else {
            return Ok(());
        };

        let now = self.store.now();

        if let Some(until) = lock.locked_until {
            if until > now {
                return Err(locked_out(until, now));
            }
            // Lock window elapsed; admit even before the sweeper reclaims
            // the record.
            return Ok(());
        }

        if lock.failed_attempts >= self.policy.max_failed_attempts {
            let until = now + self.policy.lock_window;
            self.store.set_locked_until(identifier, until)?;
            tracing::warn!(
                failed_attempts = lock.failed_attempts,
                locked_until = %until,
                "login lockout engaged"
            );
            return Err(locked_out(until, now));
        }

        Ok(())
    }

    /// Record the outcome of an authentication attempt.
    ///
    /// Success deletes the record unconditionally (back to clear). Failure
    /// reads the current counter (absent → 0) and merge-writes `counter + 1`
    /// with a server-time `lastAttemptAt`, returning the new counter. The
    /// read-then-write pair is not atomic; see the type-level note.
    pub fn record_attempt(&self, identifier: &str, success: bool) -> DomainResult<Option<u32>> {
        if success {
            self.store.clear(identifier)?;
            tracing::debug!("login succeeded, lock record cleared");
            return Ok(None);
        }

        let current = self
            .store
            .lock(identifier)?
            .map(|l| l.failed_attempts)
            .unwrap_or(0);
        let next = current + 1;

        self.store.merge_failed_attempts(identifier, next)?;
        tracing::debug!(failed_attempts = next, "login failure recorded");

        Ok(Some(next))
    }
}

fn locked_out(until: DateTime<Utc>, now: DateTime<Utc>) -> DomainError {
    let remaining_secs = (until - now).num_seconds().max(0);
    DomainError::LockedOut {
        locked_until: until,
        // Ceiling: a lock with 1s remaining still reports 1 minute.
        remaining_minutes: (remaining_secs + 59) / 60,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::FakeLockStore;

    const ID: &str = "user@example.com";

    fn lockout(store: &FakeLockStore) -> LoginLockout<&FakeLockStore> {
        LoginLockout::new(store, LockoutPolicy::default())
    }

    #[test]
    fn four_failures_still_allowed_fifth_locks() {
        let store = FakeLockStore::new();
        let lockout = lockout(&store);

        for i in 1..=4 {
            assert_eq!(lockout.record_attempt(ID, false).unwrap(), Some(i));
            lockout.check_allowed(ID).unwrap();
        }

        assert_eq!(lockout.record_attempt(ID, false).unwrap(), Some(5));
        let err = lockout.check_allowed(ID).unwrap_err();
        match err {
            DomainError::LockedOut { remaining_minutes, .. } => {
                assert_eq!(remaining_minutes, 15);
            }
            other => panic!("expected LockedOut, got {other:?}"),
        }
    }

    #[test]
    fn active_lock_rejects_without_counter_mutation() {
        let store = FakeLockStore::new();
        let lockout = lockout(&store);

        for _ in 0..5 {
            lockout.record_attempt(ID, false).unwrap();
        }
        lockout.check_allowed(ID).unwrap_err();

        let before = store.lock(ID).unwrap().unwrap();
        lockout.check_allowed(ID).unwrap_err();
        let after = store.lock(ID).unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn success_resets_to_clear_at_any_count() {
        let store = FakeLockStore::new();
        let lockout = lockout(&store);

        for _ in 0..3 {
            lockout.record_attempt(ID, false).unwrap();
        }
        assert_eq!(lockout.record_attempt(ID, true).unwrap(), None);
        assert!(store.lock(ID).unwrap().is_none());

        // Fresh failure sequence starts counting from 1 again.
        assert_eq!(lockout.record_attempt(ID, false).unwrap(), Some(1));
        lockout.check_allowed(ID).unwrap();
    }

    #[test]
    fn expired_lock_admits_before_sweep() {
        let store = FakeLockStore::new();
        let lockout = lockout(&store);

        for _ in 0..5 {
            lockout.record_attempt(ID, false).unwrap();
        }
        lockout.check_allowed(ID).unwrap_err();

        store.advance(chrono::Duration::minutes(15) + chrono::Duration::seconds(1));
        lockout.check_allowed(ID).unwrap();
    }

    #[test]
    fn remaining_minutes_round_up() {
        let store = FakeLockStore::new();
        let lockout = lockout(&store);

        for _ in 0..5 {
            lockout.record_attempt(ID, false).unwrap();
        }
        lockout.check_allowed(ID).unwrap_err();

        // 14 minutes and change left: still reported as 15.
        store.advance(chrono::Duration::seconds(30));
        match lockout.check_allowed(ID).unwrap_err() {
            DomainError::LockedOut { remaining_minutes, .. } => {
                assert_eq!(remaining_minutes, 15);
            }
            other => panic!("expected LockedOut, got {other:?}"),
        }

        store.advance(chrono::Duration::minutes(14));
        match lockout.check_allowed(ID).unwrap_err() {
            DomainError::LockedOut { remaining_minutes, .. } => {
                assert_eq!(remaining_minutes, 1);
            }
            other => panic!("expected LockedOut, got {other:?}"),
        }
    }

    #[test]
    fn unknown_identifier_is_allowed() {
        let store = FakeLockStore::new();
        lockout(&store).check_allowed("nobody@example.com").unwrap();
    }

    #[test]
    fn merge_preserves_locked_until() {
        let store = FakeLockStore::new();
        let lockout = lockout(&store);

        for _ in 0..5 {
            lockout.record_attempt(ID, false).unwrap();
        }
        lockout.check_allowed(ID).unwrap_err();

        // A further failure while locked must not drop lockedUntil.
        lockout.record_attempt(ID, false).unwrap();
        assert!(store.lock(ID).unwrap().unwrap().locked_until.is_some());
    }
}
