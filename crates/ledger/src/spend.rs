use devforum_core::{AccountId, DomainResult};
use devforum_questions::QuestionDraft;

use crate::entry::{EntryDraft, EntryType, RelatedType};
use crate::store::{LedgerStore, SpendReceipt, TransactionAbort};

/// Policy constants for posting. Configurable; the observed defaults are a
/// 10-unit cost and a 5-minute duplicate window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingPolicy {
    pub question_cost: u64,
    pub duplicate_window: chrono::Duration,
}

impl Default for PostingPolicy {
    fn default() -> Self {
        Self {
            question_cost: 10,
            duplicate_window: chrono::Duration::minutes(5),
        }
    }
}

/// The account balance ledger.
///
/// `spend_and_create` is the single point where balance mutation happens:
/// precondition check, debit, question creation and the audit entry all commit
/// atomically or not at all.
#[derive(Debug, Clone)]
pub struct BalanceLedger<S> {
    store: S,
    policy: PostingPolicy,
}

impl<S: LedgerStore> BalanceLedger<S> {
    pub fn new(store: S, policy: PostingPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &PostingPolicy {
        &self.policy
    }

    /// Debit `question_cost` from `owner`, create the question and append the
    /// matching ledger entry, atomically.
    ///
    /// The balance is read inside the transaction; concurrent spends against
    /// the same account serialize on the account document, so a losing
    /// invocation either retries against the fresh balance or aborts with
    /// `InsufficientFunds`. No side effects occur on any abort path.
    pub fn spend_and_create(
        &self,
        owner: AccountId,
        draft: &QuestionDraft,
    ) -> DomainResult<SpendReceipt> {
        let cost = self.policy.question_cost;

        let receipt = self.store.run_transaction(&mut |tx| {
            let account = tx.account(&owner)?.ok_or(TransactionAbort::AccountNotFound)?;

            if account.balance < cost {
                return Err(TransactionAbort::InsufficientFunds {
                    balance: account.balance,
                    required: cost,
                });
            }

            let question_id = tx.create_question(owner, draft)?;

            let remaining = account.balance - cost;
            tx.set_balance(&owner, remaining)?;

            tx.append_entry(EntryDraft {
                owner_id: owner,
                entry_type: EntryType::QuestionPost,
                amount: -(cost as i64),
                is_free: false,
                related_id: question_id,
                related_type: RelatedType::Question,
            })?;

            Ok(SpendReceipt {
                question_id,
                remaining_balance: remaining,
            })
        })?;

        tracing::info!(
            owner = %owner,
            question = %receipt.question_id,
            remaining = receipt.remaining_balance,
            "question posted, balance debited"
        );

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::SingleAccountStore;
    use devforum_core::DomainError;
    use devforum_questions::Category;

    fn draft() -> QuestionDraft {
        QuestionDraft::new("valid title", "long enough body", None, Category::Backend).unwrap()
    }

    #[test]
    fn debits_and_records_entry() {
        let store = SingleAccountStore::with_balance(25);
        let ledger = BalanceLedger::new(&store, PostingPolicy::default());

        let receipt = ledger.spend_and_create(store.account_id(), &draft()).unwrap();
        assert_eq!(receipt.remaining_balance, 15);

        let entries = store.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].amount, -10);
        assert_eq!(entries[0].related_id, receipt.question_id);
        assert!(!entries[0].is_free);
    }

    #[test]
    fn insufficient_funds_aborts_without_side_effects() {
        let store = SingleAccountStore::with_balance(9);
        let ledger = BalanceLedger::new(&store, PostingPolicy::default());

        let err = ledger.spend_and_create(store.account_id(), &draft()).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientFunds {
                balance: 9,
                required: 10
            }
        );
        assert_eq!(store.balance(), 9);
        assert!(store.entries().is_empty());
        assert_eq!(store.question_count(), 0);
    }

    #[test]
    fn unknown_account_is_not_found() {
        let store = SingleAccountStore::with_balance(100);
        let ledger = BalanceLedger::new(&store, PostingPolicy::default());

        let err = ledger
            .spend_and_create(devforum_core::AccountId::new(), &draft())
            .unwrap_err();
        assert_eq!(err, DomainError::AccountNotFound);
    }

    #[test]
    fn exact_balance_spends_to_zero() {
        let store = SingleAccountStore::with_balance(10);
        let ledger = BalanceLedger::new(&store, PostingPolicy::default());

        let receipt = ledger.spend_and_create(store.account_id(), &draft()).unwrap();
        assert_eq!(receipt.remaining_balance, 0);
        assert_eq!(store.balance(), 0);
    }
}
