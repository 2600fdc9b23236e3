use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use devforum_core::{AccountId, QuestionId};

/// What a ledger entry paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    QuestionPost,
}

/// Kind of record an entry points at via `relatedId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelatedType {
    Question,
}

/// Entry fields supplied by the ledger transaction. The store stamps
/// `createdAt` at commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub owner_id: AccountId,
    pub entry_type: EntryType,
    /// Signed amount; negative for spends.
    pub amount: i64,
    pub is_free: bool,
    pub related_id: QuestionId,
    pub related_type: RelatedType,
}

/// Committed audit record. Append-only; one entry per successful debit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub owner_id: AccountId,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub amount: i64,
    pub is_free: bool,
    pub related_id: QuestionId,
    pub related_type: RelatedType,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn from_draft(draft: EntryDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            owner_id: draft.owner_id,
            entry_type: draft.entry_type,
            amount: draft.amount,
            is_free: draft.is_free,
            related_id: draft.related_id,
            related_type: draft.related_type,
            created_at,
        }
    }
}
