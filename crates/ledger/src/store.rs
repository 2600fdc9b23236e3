use chrono::{DateTime, Utc};

use devforum_core::{AccountId, DomainError, QuestionId, StoreError};
use devforum_questions::QuestionDraft;

use crate::account::Account;
use crate::entry::EntryDraft;

/// Outcome of a committed spend transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpendReceipt {
    pub question_id: QuestionId,
    pub remaining_balance: u64,
}

/// Reasons a transaction body gives up without committing.
///
/// Aborts are terminal for the transaction: no writes land and the store must
/// not re-run the body (only write conflicts are retried).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionAbort {
    AccountNotFound,
    InsufficientFunds { balance: u64, required: u64 },
    Store(StoreError),
}

impl From<StoreError> for TransactionAbort {
    fn from(err: StoreError) -> Self {
        TransactionAbort::Store(err)
    }
}

impl From<TransactionAbort> for DomainError {
    fn from(abort: TransactionAbort) -> Self {
        match abort {
            TransactionAbort::AccountNotFound => DomainError::AccountNotFound,
            TransactionAbort::InsufficientFunds { balance, required } => {
                DomainError::InsufficientFunds { balance, required }
            }
            TransactionAbort::Store(e) => e.into(),
        }
    }
}

/// Operations available inside one atomic transaction.
///
/// Reads observe the transaction's snapshot, never a prior stale read. Writes
/// are buffered and become visible atomically at commit, stamped with the
/// store's commit-time clock.
pub trait LedgerTransaction {
    /// Fresh in-transaction read of an account.
    fn account(&mut self, id: &AccountId) -> Result<Option<Account>, StoreError>;

    fn set_balance(&mut self, id: &AccountId, balance: u64) -> Result<(), StoreError>;

    /// Buffer a question document for creation. The store assigns a fresh id
    /// immediately and the `createdAt` timestamp at commit.
    fn create_question(
        &mut self,
        owner: AccountId,
        draft: &QuestionDraft,
    ) -> Result<QuestionId, StoreError>;

    /// Buffer an append-only ledger entry.
    fn append_entry(&mut self, draft: EntryDraft) -> Result<(), StoreError>;
}

/// Port to the durable store, as seen by the ledger.
///
/// Implementations must:
/// - run the body under serializable isolation for the documents it touches
/// - re-run the body on write conflict up to a bounded retry budget, then
///   fail with [`DomainError::Contention`] (never partially apply)
/// - return aborts from the body immediately, with no side effects
/// - assign all timestamps from the store clock at commit time
pub trait LedgerStore: Send + Sync {
    fn run_transaction(
        &self,
        body: &mut dyn FnMut(&mut dyn LedgerTransaction) -> Result<SpendReceipt, TransactionAbort>,
    ) -> Result<SpendReceipt, DomainError>;

    /// Point-in-time lookup of a non-deleted question by the same owner with
    /// the same title created strictly after `newer_than`. Runs outside any
    /// transaction.
    fn find_recent_question(
        &self,
        owner: &AccountId,
        title: &str,
        newer_than: DateTime<Utc>,
    ) -> Result<Option<QuestionId>, StoreError>;

    /// The store's clock. All windowing comparisons use this, never a
    /// caller-supplied timestamp.
    fn now(&self) -> DateTime<Utc>;
}

impl<S> LedgerStore for &S
where
    S: LedgerStore + ?Sized,
{
    fn run_transaction(
        &self,
        body: &mut dyn FnMut(&mut dyn LedgerTransaction) -> Result<SpendReceipt, TransactionAbort>,
    ) -> Result<SpendReceipt, DomainError> {
        (**self).run_transaction(body)
    }

    fn find_recent_question(
        &self,
        owner: &AccountId,
        title: &str,
        newer_than: DateTime<Utc>,
    ) -> Result<Option<QuestionId>, StoreError> {
        (**self).find_recent_question(owner, title, newer_than)
    }

    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<S> LedgerStore for std::sync::Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn run_transaction(
        &self,
        body: &mut dyn FnMut(&mut dyn LedgerTransaction) -> Result<SpendReceipt, TransactionAbort>,
    ) -> Result<SpendReceipt, DomainError> {
        (**self).run_transaction(body)
    }

    fn find_recent_question(
        &self,
        owner: &AccountId,
        title: &str,
        newer_than: DateTime<Utc>,
    ) -> Result<Option<QuestionId>, StoreError> {
        (**self).find_recent_question(owner, title, newer_than)
    }

    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
