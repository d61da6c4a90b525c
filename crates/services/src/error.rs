//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuestionId;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by session navigation and grading.
///
/// All of these are recoverable: the session is left unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session has no questions")]
    Empty,
    #[error("session already completed")]
    Completed,
    #[error("current question has not been answered")]
    Unanswered,
    #[error("already at the last question")]
    AtLastQuestion,
    #[error("not at the last question yet")]
    NotAtLastQuestion,
    #[error("question {0} is not part of this session")]
    UnknownQuestion(QuestionId),
}

/// Errors raised while reading or writing a persisted list.
///
/// The ledger and preference services log and swallow these.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LedgerError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("stored value is not valid: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
