//! Shared error types for the services crate.

use std::fmt;

use thiserror::Error;

use sanderson_core::model::quiz::{QuestionSetError, QuizSessionError, QuizValidationError};
use sanderson_core::model::{AppSettingsError, ChatMessageError, DataUriError, QuizAttemptError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the OpenAI-compatible client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AiError {
    #[error("AI features are not configured")]
    Disabled,
    #[error("AI service returned an empty response")]
    EmptyResponse,
    #[error("AI request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("could not decode AI response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("AI service returned an invalid image: {0}")]
    InvalidImage(#[from] DataUriError),
}

/// Why a single quiz generation attempt was unusable.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationFailure {
    #[error(transparent)]
    Source(#[from] AiError),
    #[error(transparent)]
    InvalidSet(#[from] QuestionSetError),
}

/// Both generation attempts, in order.
#[derive(Debug)]
pub struct GenerationAttempts {
    pub first: GenerationFailure,
    pub retry: GenerationFailure,
}

impl fmt::Display for GenerationAttempts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "first attempt: {}; retry: {}", self.first, self.retry)
    }
}

/// Errors emitted when starting a quiz.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizStartError {
    #[error("quiz generation failed ({0})")]
    GenerationFailed(Box<GenerationAttempts>),
    #[error(transparent)]
    Catalog(#[from] QuizValidationError),
    #[error(transparent)]
    Session(#[from] QuizSessionError),
}

/// Errors emitted by `ChatService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatError {
    #[error(transparent)]
    Message(#[from] ChatMessageError),
    #[error(transparent)]
    Ai(#[from] AiError),
    #[error("invalid article URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("image prompt cannot be empty")]
    EmptyPrompt,
}

/// Errors emitted by `QuizHistoryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizHistoryError {
    #[error(transparent)]
    Attempt(#[from] QuizAttemptError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AppSettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppSettingsServiceError {
    #[error(transparent)]
    Settings(#[from] AppSettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by transcript export.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("there are no messages to export")]
    Empty,
    #[error("failed to render transcript PDF: {0}")]
    Pdf(#[from] printpdf::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Settings(#[from] AppSettingsServiceError),
}
