//! Question domain: record layout, draft validation, category whitelist.

pub mod question;

pub use question::{
    Category, DeletionStatus, Question, QuestionDraft, ATTACHMENT_MAX_CHARS, BODY_MAX_CHARS,
    BODY_MIN_CHARS, TITLE_MAX_CHARS, TITLE_MIN_CHARS,
};
