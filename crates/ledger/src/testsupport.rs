//! Minimal single-account fake store for unit tests in this crate.
//! Cross-component and concurrency coverage lives in `devforum-infra`.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use devforum_core::{AccountId, DomainError, QuestionId, StoreError};
use devforum_questions::{DeletionStatus, Question, QuestionDraft};

use crate::entry::{EntryDraft, LedgerEntry};
use crate::store::{LedgerStore, LedgerTransaction, SpendReceipt, TransactionAbort};

pub struct SingleAccountStore {
    account_id: AccountId,
    balance: Mutex<Option<u64>>,
    questions: Mutex<Vec<Question>>,
    entries: Mutex<Vec<LedgerEntry>>,
    now: Mutex<DateTime<Utc>>,
}

impl SingleAccountStore {
    pub fn with_balance(balance: u64) -> Self {
        Self {
            account_id: AccountId::new(),
            balance: Mutex::new(Some(balance)),
            questions: Mutex::new(Vec::new()),
            entries: Mutex::new(Vec::new()),
            now: Mutex::new(Utc::now()),
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn balance(&self) -> u64 {
        self.balance.lock().unwrap().unwrap()
    }

    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn question_count(&self) -> usize {
        self.questions.lock().unwrap().len()
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.now.lock().unwrap() += by;
    }

    pub fn set_deletion_status(&self, id: QuestionId, status: DeletionStatus) {
        let mut questions = self.questions.lock().unwrap();
        let q = questions.iter_mut().find(|q| q.id == id).unwrap();
        q.deletion_status = status;
    }
}

struct PendingTxn<'a> {
    store: &'a SingleAccountStore,
    balance_write: Option<u64>,
    question: Option<(QuestionId, AccountId, QuestionDraft)>,
    entry: Option<EntryDraft>,
}

impl LedgerTransaction for PendingTxn<'_> {
    fn account(&mut self, id: &AccountId) -> Result<Option<crate::account::Account>, StoreError> {
        if *id != self.store.account_id {
            return Ok(None);
        }
        Ok(self
            .store
            .balance
            .lock()
            .unwrap()
            .map(|b| crate::account::Account { balance: b }))
    }

    fn set_balance(&mut self, _id: &AccountId, balance: u64) -> Result<(), StoreError> {
        self.balance_write = Some(balance);
        Ok(())
    }

    fn create_question(
        &mut self,
        owner: AccountId,
        draft: &QuestionDraft,
    ) -> Result<QuestionId, StoreError> {
        let id = QuestionId::new();
        self.question = Some((id, owner, draft.clone()));
        Ok(id)
    }

    fn append_entry(&mut self, draft: EntryDraft) -> Result<(), StoreError> {
        self.entry = Some(draft);
        Ok(())
    }
}

impl LedgerStore for SingleAccountStore {
    fn run_transaction(
        &self,
        body: &mut dyn FnMut(&mut dyn LedgerTransaction) -> Result<SpendReceipt, TransactionAbort>,
    ) -> Result<SpendReceipt, DomainError> {
        let mut txn = PendingTxn {
            store: self,
            balance_write: None,
            question: None,
            entry: None,
        };

        let receipt = body(&mut txn).map_err(DomainError::from)?;

        let committed_at = self.now();
        if let Some(b) = txn.balance_write {
            *self.balance.lock().unwrap() = Some(b);
        }
        if let Some((id, owner, draft)) = txn.question {
            self.questions
                .lock()
                .unwrap()
                .push(Question::from_draft(id, owner, &draft, committed_at));
        }
        if let Some(entry) = txn.entry {
            self.entries
                .lock()
                .unwrap()
                .push(LedgerEntry::from_draft(entry, committed_at));
        }

        Ok(receipt)
    }

    fn find_recent_question(
        &self,
        owner: &AccountId,
        title: &str,
        newer_than: DateTime<Utc>,
    ) -> Result<Option<QuestionId>, StoreError> {
        Ok(self
            .questions
            .lock()
            .unwrap()
            .iter()
            .find(|q| {
                q.owner_id == *owner
                    && q.title == title
                    && q.deletion_status == DeletionStatus::Normal
                    && q.created_at > newer_than
            })
            .map(|q| q.id))
    }

    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
