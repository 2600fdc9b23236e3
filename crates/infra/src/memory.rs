//! In-memory document store.
//!
//! Intended for tests/dev; carries the production store's contract so it can
//! be swapped for a real backend later. Ledger transactions run optimistically:
//! reads record document versions, writes are buffered, and commit validates
//! the read set under the state lock, re-running the transaction body on
//! conflict up to a bounded retry budget.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use devforum_core::{AccountId, DomainError, QuestionId, StoreError};
use devforum_ledger::{
    Account, EntryDraft, LedgerEntry, LedgerStore, LedgerTransaction, SpendReceipt,
    TransactionAbort,
};
use devforum_lockout::{LockStore, LoginLock};
use devforum_questions::{DeletionStatus, Question, QuestionDraft};

use crate::clock::{Clock, SystemClock};

const DEFAULT_TXN_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone)]
struct AccountSlot {
    account: Account,
    /// Bumped on every balance write; the read-set validation key.
    version: u64,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<AccountId, AccountSlot>,
    questions: HashMap<QuestionId, Question>,
    entries: Vec<LedgerEntry>,
    locks: HashMap<String, LoginLock>,
}

pub struct InMemoryStore {
    state: RwLock<State>,
    clock: Arc<dyn Clock>,
    max_txn_attempts: u32,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(State::default()),
            clock,
            max_txn_attempts: DEFAULT_TXN_ATTEMPTS,
        }
    }

    /// Override the transaction retry budget (conflict retries before the
    /// operation fails as transient).
    pub fn with_txn_attempts(mut self, attempts: u32) -> Self {
        self.max_txn_attempts = attempts;
        self
    }

    /// Upsert an account document outside any transaction (wiring/tests;
    /// account provisioning is not part of the engine).
    pub fn put_account(&self, id: AccountId, account: Account) -> Result<(), StoreError> {
        let mut state = self.write_state()?;
        let slot = state.accounts.entry(id).or_insert(AccountSlot {
            account,
            version: 0,
        });
        slot.account = account;
        slot.version += 1;
        Ok(())
    }

    pub fn account(&self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.read_state()?.accounts.get(id).map(|s| s.account))
    }

    pub fn question(&self, id: &QuestionId) -> Result<Option<Question>, StoreError> {
        Ok(self.read_state()?.questions.get(id).cloned())
    }

    pub fn questions(&self) -> Result<Vec<Question>, StoreError> {
        Ok(self.read_state()?.questions.values().cloned().collect())
    }

    pub fn entries(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        Ok(self.read_state()?.entries.clone())
    }

    /// Flip a question's soft-deletion state (moderation is outside the
    /// engine; tests use this to exercise the duplicate guard's filter).
    pub fn set_deletion_status(
        &self,
        id: &QuestionId,
        status: DeletionStatus,
    ) -> Result<(), StoreError> {
        let mut state = self.write_state()?;
        match state.questions.get_mut(id) {
            Some(q) => {
                q.deletion_status = status;
                Ok(())
            }
            None => Err(StoreError::Unavailable(format!("no question {id}"))),
        }
    }

    fn read_state(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("state lock poisoned".to_string()))
    }

    fn write_state(&self) -> Result<std::sync::RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("state lock poisoned".to_string()))
    }

    /// Validate the read set and apply buffered writes. Returns false on a
    /// version conflict (caller re-runs the transaction body).
    fn try_commit(&self, txn: MemoryTransaction<'_>) -> Result<bool, StoreError> {
        let mut state = self.write_state()?;

        for (id, observed) in &txn.reads {
            let current = state.accounts.get(id).map(|s| s.version);
            if current != *observed {
                return Ok(false);
            }
        }

        let committed_at = self.clock.now();

        for (id, balance) in txn.balance_writes {
            let slot = state.accounts.get_mut(&id).ok_or_else(|| {
                StoreError::Unavailable(format!("account {id} vanished mid-commit"))
            })?;
            slot.account.balance = balance;
            slot.version += 1;
        }

        for (id, owner, draft) in txn.new_questions {
            state
                .questions
                .insert(id, Question::from_draft(id, owner, &draft, committed_at));
        }

        for draft in txn.new_entries {
            state.entries.push(LedgerEntry::from_draft(draft, committed_at));
        }

        Ok(true)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

struct MemoryTransaction<'a> {
    store: &'a InMemoryStore,
    /// Account versions observed by in-transaction reads (None = absent).
    reads: Vec<(AccountId, Option<u64>)>,
    balance_writes: Vec<(AccountId, u64)>,
    new_questions: Vec<(QuestionId, AccountId, QuestionDraft)>,
    new_entries: Vec<EntryDraft>,
}

impl<'a> MemoryTransaction<'a> {
    fn new(store: &'a InMemoryStore) -> Self {
        Self {
            store,
            reads: Vec::new(),
            balance_writes: Vec::new(),
            new_questions: Vec::new(),
            new_entries: Vec::new(),
        }
    }
}

impl LedgerTransaction for MemoryTransaction<'_> {
    fn account(&mut self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        let state = self.store.read_state()?;
        let slot = state.accounts.get(id);
        self.reads.push((*id, slot.map(|s| s.version)));
        Ok(slot.map(|s| s.account))
    }

    fn set_balance(&mut self, id: &AccountId, balance: u64) -> Result<(), StoreError> {
        self.balance_writes.push((*id, balance));
        Ok(())
    }

    fn create_question(
        &mut self,
        owner: AccountId,
        draft: &QuestionDraft,
    ) -> Result<QuestionId, StoreError> {
        // Fresh store-assigned id; the commit-time timestamp comes later.
        let id = QuestionId::new();
        self.new_questions.push((id, owner, draft.clone()));
        Ok(id)
    }

    fn append_entry(&mut self, draft: EntryDraft) -> Result<(), StoreError> {
        self.new_entries.push(draft);
        Ok(())
    }
}

impl LedgerStore for InMemoryStore {
    fn run_transaction(
        &self,
        body: &mut dyn FnMut(&mut dyn LedgerTransaction) -> Result<SpendReceipt, TransactionAbort>,
    ) -> Result<SpendReceipt, DomainError> {
        for attempt in 1..=self.max_txn_attempts {
            let mut txn = MemoryTransaction::new(self);

            // Aborts are terminal: no retry, no side effects.
            let receipt = body(&mut txn).map_err(DomainError::from)?;

            if self.try_commit(txn).map_err(DomainError::from)? {
                return Ok(receipt);
            }

            tracing::trace!(attempt, "ledger transaction conflict, retrying");
        }

        Err(DomainError::Contention {
            attempts: self.max_txn_attempts,
        })
    }

    fn find_recent_question(
        &self,
        owner: &AccountId,
        title: &str,
        newer_than: DateTime<Utc>,
    ) -> Result<Option<QuestionId>, StoreError> {
        let state = self.read_state()?;
        Ok(state
            .questions
            .values()
            .find(|q| {
                q.owner_id == *owner
                    && q.title == title
                    && q.deletion_status == DeletionStatus::Normal
                    && q.created_at > newer_than
            })
            .map(|q| q.id))
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

impl LockStore for InMemoryStore {
    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn lock(&self, identifier: &str) -> Result<Option<LoginLock>, StoreError> {
        Ok(self.read_state()?.locks.get(identifier).cloned())
    }

    fn merge_failed_attempts(
        &self,
        identifier: &str,
        failed_attempts: u32,
    ) -> Result<(), StoreError> {
        let now = self.clock.now();
        let mut state = self.write_state()?;
        state
            .locks
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
        let mut state = self.write_state()?;
        if let Some(l) = state.locks.get_mut(identifier) {
            l.locked_until = Some(locked_until);
        }
        Ok(())
    }

    fn clear(&self, identifier: &str) -> Result<(), StoreError> {
        self.write_state()?.locks.remove(identifier);
        Ok(())
    }

    fn delete_expired(&self, cutoff: DateTime<Utc>, limit: usize) -> Result<usize, StoreError> {
        let mut state = self.write_state()?;
        let expired: Vec<String> = state
            .locks
            .iter()
            .filter(|(_, l)| l.locked_until.is_some_and(|u| u <= cutoff))
            .map(|(k, _)| k.clone())
            .take(limit)
            .collect();

        for key in &expired {
            state.locks.remove(key);
        }

        Ok(expired.len())
    }
}
