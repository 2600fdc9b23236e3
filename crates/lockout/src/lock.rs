use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-identifier login-lock document.
///
/// Created on first failure, merged on each further failure, deleted on
/// success or by the sweeper once `lockedUntil` has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginLock {
    pub failed_attempts: u32,
    /// Server-assigned timestamp of the most recent failed attempt.
    pub last_attempt_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_until: Option<DateTime<Utc>>,
}
