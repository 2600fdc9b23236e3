use devforum_core::AccountId;

/// Caller context for a request (authenticated account).
///
/// This is immutable and must be present for all authenticated routes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CallerContext {
    account_id: AccountId,
}

impl CallerContext {
    pub fn new(account_id: AccountId) -> Self {
        Self { account_id }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }
}
