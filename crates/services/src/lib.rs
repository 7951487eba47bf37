#![forbid(unsafe_code)]

pub mod ai;
pub mod app_services;
pub mod app_settings_service;
pub mod assistant;
pub mod chat_service;
pub mod error;
pub mod question_source;
pub mod quiz_history_service;
pub mod quiz_service;
pub mod transcript_export;

pub use sanderson_core::time::Clock;

pub use app_services::AppServices;
pub use app_settings_service::AppSettingsService;
pub use assistant::{AssistantBackend, AssistantReply, LlmAssistant};
pub use chat_service::ChatService;
pub use error::{
    AiError, AppServicesError, AppSettingsServiceError, ChatError, ExportError,
    GenerationAttempts, GenerationFailure, QuizHistoryError, QuizStartError,
};
pub use question_source::{LlmQuestionSource, QuestionSource};
pub use quiz_history_service::{QuizAttemptListItem, QuizHistoryService};
pub use quiz_service::{QuizService, QuizSubmission};
pub use transcript_export::{
    DEFAULT_TRANSCRIPT_FILE, PageLayout, TranscriptLine, export_transcript, paginate,
    render_transcript,
};
