use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use devforum_core::{AccountId, DomainError, DomainResult, QuestionId};

pub const TITLE_MIN_CHARS: usize = 5;
pub const TITLE_MAX_CHARS: usize = 200;
pub const BODY_MIN_CHARS: usize = 10;
pub const BODY_MAX_CHARS: usize = 10_000;
pub const ATTACHMENT_MAX_CHARS: usize = 5_000;

/// Closed category set. Anything outside it is rejected as invalid input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Flutter,
    Firebase,
    Dart,
    Backend,
    Design,
    Other,
}

/// Soft-deletion state of a question. Only `Normal` questions are visible to
/// the duplicate-submission guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletionStatus {
    Normal,
    Deleted,
    Scheduled,
}

/// Validated question input, ready to be created inside a ledger transaction.
///
/// Construction via [`QuestionDraft::new`] is the single place field bounds
/// are enforced; validation happens before any store access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    title: String,
    body: String,
    attachment: Option<String>,
    category: Category,
}

impl QuestionDraft {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        attachment: Option<String>,
        category: Category,
    ) -> DomainResult<Self> {
        let title = title.into();
        let body = body.into();

        let title_len = title.chars().count();
        if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&title_len) {
            return Err(DomainError::invalid_argument(format!(
                "title must be {TITLE_MIN_CHARS}-{TITLE_MAX_CHARS} characters (got {title_len})"
            )));
        }

        let body_len = body.chars().count();
        if !(BODY_MIN_CHARS..=BODY_MAX_CHARS).contains(&body_len) {
            return Err(DomainError::invalid_argument(format!(
                "body must be {BODY_MIN_CHARS}-{BODY_MAX_CHARS} characters (got {body_len})"
            )));
        }

        if let Some(ref a) = attachment {
            let len = a.chars().count();
            if len > ATTACHMENT_MAX_CHARS {
                return Err(DomainError::invalid_argument(format!(
                    "attachment must be at most {ATTACHMENT_MAX_CHARS} characters (got {len})"
                )));
            }
        }

        Ok(Self {
            title,
            body,
            attachment,
            category,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn attachment(&self) -> Option<&str> {
        self.attachment.as_deref()
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

/// A committed question document.
///
/// Created exactly once per successful ledger transaction; `created_at` is the
/// store's commit-time clock, not a caller timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    pub body: String,
    pub attachment: Option<String>,
    pub owner_id: AccountId,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub answer_count: u32,
    pub view_count: u32,
    pub score: i64,
    pub best_answer_id: Option<Uuid>,
    pub deletion_status: DeletionStatus,
    pub deletion_reason: Option<String>,
    pub scheduled_deletion_at: Option<DateTime<Utc>>,
}

impl Question {
    /// Materialize a draft at commit time. Counters start at zero and the
    /// best-answer pointer starts empty.
    pub fn from_draft(
        id: QuestionId,
        owner_id: AccountId,
        draft: &QuestionDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            body: draft.body.clone(),
            attachment: draft.attachment.clone(),
            owner_id,
            category: draft.category,
            created_at,
            updated_at: None,
            answer_count: 0,
            view_count: 0,
            score: 0,
            best_answer_id: None,
            deletion_status: DeletionStatus::Normal,
            deletion_reason: None,
            scheduled_deletion_at: None,
        }
    }
}
