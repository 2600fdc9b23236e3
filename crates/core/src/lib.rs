//! Shared kernel: strongly-typed identifiers and the error taxonomy.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult, StoreError};
pub use id::{AccountId, QuestionId};
