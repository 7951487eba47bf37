mod app_settings;
mod attempt;
mod chat;
mod ids;
mod media;
pub mod quiz;
mod resources;

pub use app_settings::{AppSettings, AppSettingsDraft, AppSettingsError, MAX_QUIZ_LENGTH};
pub use attempt::{QuizAttempt, QuizAttemptError};
pub use chat::{
    ASSISTANT_NAME, ChatMessage, ChatMessageError, Conversation, DEFAULT_IMAGE_QUESTION,
    ERROR_REPLY, Entity, MAX_ENTITIES, NlpAnalysis, Role, Sentiment, UserMessageDraft,
};
pub use ids::{AttemptId, MessageId, ParseIdError};
pub use media::{DataUriError, ImageDataUri};
pub use resources::{MAX_SUGGESTED_RESOURCES, SuggestedResource, resources_for_topic};
