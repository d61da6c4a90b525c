use thiserror::Error;

use crate::model::{QuestionError, SettingsError, TopicError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Topic(#[from] TopicError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
