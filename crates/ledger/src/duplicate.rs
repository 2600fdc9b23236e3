use devforum_core::{AccountId, DomainError, DomainResult};

use crate::store::LedgerStore;

/// Advisory pre-transaction check against accidental double submissions.
///
/// The probe runs outside the ledger transaction, so two near-simultaneous
/// identical submissions can both pass it. That race is accepted: the guard
/// throttles double-clicks, it is not a replay defense.
#[derive(Debug, Clone)]
pub struct DuplicateGuard<S> {
    store: S,
    window: chrono::Duration,
}

impl<S: LedgerStore> DuplicateGuard<S> {
    pub fn new(store: S, window: chrono::Duration) -> Self {
        Self { store, window }
    }

    /// Reject when a non-deleted question with the same title by the same
    /// owner exists inside the cooldown window. Soft-deleted questions never
    /// trigger the cooldown.
    pub fn check(&self, owner: AccountId, title: &str) -> DomainResult<()> {
        let cutoff = self.store.now() - self.window;

        if self
            .store
            .find_recent_question(&owner, title, cutoff)?
            .is_some()
        {
            tracing::debug!(owner = %owner, "duplicate submission rejected");
            return Err(DomainError::DuplicateSubmission {
                window_secs: self.window.num_seconds(),
            });
        }

        Ok(())
    }
}
