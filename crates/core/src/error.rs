use thiserror::Error;

use crate::model::quiz::{QuestionSetError, QuizSessionError, QuizValidationError};
use crate::model::{AppSettingsError, ChatMessageError, DataUriError, QuizAttemptError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    QuizValidation(#[from] QuizValidationError),
    #[error(transparent)]
    QuestionSet(#[from] QuestionSetError),
    #[error(transparent)]
    QuizSession(#[from] QuizSessionError),
    #[error(transparent)]
    QuizAttempt(#[from] QuizAttemptError),
    #[error(transparent)]
    ChatMessage(#[from] ChatMessageError),
    #[error(transparent)]
    DataUri(#[from] DataUriError),
    #[error(transparent)]
    AppSettings(#[from] AppSettingsError),
}
