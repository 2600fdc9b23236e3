//! HashMap-backed fake lock store with a movable clock, for unit tests in
//! this crate.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use devforum_core::StoreError;

use crate::lock::LoginLock;
use crate::store::LockStore;

pub struct FakeLockStore {
    locks: Mutex<HashMap<String, LoginLock>>,
    now: Mutex<DateTime<Utc>>,
}

impl FakeLockStore {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            now: Mutex::new(Utc::now()),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl LockStore for FakeLockStore {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    fn lock(&self, identifier: &str) -> Result<Option<LoginLock>, StoreError> {
        Ok(self.locks.lock().unwrap().get(identifier).cloned())
    }

    fn merge_failed_attempts(
        &self,
        identifier: &str,
        failed_attempts: u32,
    ) -> Result<(), StoreError> {
        let now = self.now();
        let mut locks = self.locks.lock().unwrap();
        locks
            .entry(identifier.to_string())
            .and_modify(|l| {
                l.failed_attempts = failed_attempts;
                l.last_attempt_at = now;
            })
            .or_insert(LoginLock {
                failed_attempts,
                last_attempt_at: now,
                locked_until: None,
            });
        Ok(())
    }

    fn set_locked_until(
        &self,
        identifier: &str,
        locked_until: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut locks = self.locks.lock().unwrap();
        if let Some(l) = locks.get_mut(identifier) {
            l.locked_until = Some(locked_until);
        }
        Ok(())
    }

    fn clear(&self, identifier: &str) -> Result<(), StoreError> {
        self.locks.lock().unwrap().remove(identifier);
        Ok(())
    }

    fn delete_expired(&self, cutoff: DateTime<Utc>, limit: usize) -> Result<usize, StoreError> {
        let mut locks = self.locks.lock().unwrap();
        let expired: Vec<String> = locks
            .iter()
            .filter(|(_, l)| l.locked_until.is_some_and(|u| u <= cutoff))
            .map(|(k, _)| k.clone())
            .take(limit)
            .collect();
        for key in &expired {
            locks.remove(key);
        }
        Ok(expired.len())
    }
}
