//! The account balance ledger: atomic
//! "debit + create question + append audit entry" transactions and the
//! advisory duplicate-submission guard.
//!
//! Storage is behind the [`store::LedgerStore`] port; the engine never talks
//! to a concrete backend and never holds process-global state.

pub mod account;
pub mod duplicate;
pub mod entry;
pub mod spend;
pub mod store;

#[cfg(test)]
pub(crate) mod testsupport;

pub use account::Account;
pub use duplicate::DuplicateGuard;
pub use entry::{EntryDraft, EntryType, LedgerEntry, RelatedType};
pub use spend::{BalanceLedger, PostingPolicy};
pub use store::{LedgerStore, LedgerTransaction, SpendReceipt, TransactionAbort};
