use std::env;
use std::sync::Arc;

use sanderson_core::model::AppSettings;
use storage::repository::Storage;
use tracing::info;

use crate::Clock;
use crate::ai::{AiClient, AiConfig};
use crate::app_settings_service::AppSettingsService;
use crate::assistant::{AssistantBackend, LlmAssistant};
use crate::chat_service::ChatService;
use crate::error::AppServicesError;
use crate::question_source::{LlmQuestionSource, QuestionSource};
use crate::quiz_history_service::QuizHistoryService;
use crate::quiz_service::QuizService;

/// Assembles app-facing services around one storage backend.
#[derive(Clone)]
pub struct AppServices {
    settings: AppSettings,
    ai_enabled: bool,
    chat: Arc<ChatService>,
    quiz: Arc<QuizService>,
    quiz_history: Arc<QuizHistoryService>,
    app_settings: Arc<AppSettingsService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the configured AI endpoint.
    ///
    /// Persisted settings take precedence over environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or loading settings fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let app_settings = AppSettingsService::new(Arc::clone(&storage.settings));
        let settings = app_settings.load().await?;

        let config = AiConfig::resolve(&settings, |key| env::var(key).ok());
        let client = Arc::new(AiClient::new(config));
        info!(ai_enabled = client.enabled(), "app services ready");

        Ok(Self::with_backends(
            storage,
            settings,
            clock,
            client.enabled(),
            Arc::new(LlmQuestionSource::new(Arc::clone(&client))),
            Arc::new(LlmAssistant::new(client)),
        ))
    }

    /// Assemble services from explicit parts.
    #[must_use]
    pub fn with_backends(
        storage: Storage,
        settings: AppSettings,
        clock: Clock,
        ai_enabled: bool,
        source: Arc<dyn QuestionSource>,
        backend: Arc<dyn AssistantBackend>,
    ) -> Self {
        Self {
            settings,
            ai_enabled,
            chat: Arc::new(ChatService::new(clock, backend)),
            quiz: Arc::new(QuizService::new(clock, source, Arc::clone(&storage.attempts))),
            quiz_history: Arc::new(QuizHistoryService::new(Arc::clone(&storage.attempts))),
            app_settings: Arc::new(AppSettingsService::new(storage.settings)),
        }
    }

    /// Settings as loaded at startup, with command-line overrides applied.
    #[must_use]
    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    #[must_use]
    pub fn with_settings(mut self, settings: AppSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }

    #[must_use]
    pub fn chat(&self) -> Arc<ChatService> {
        Arc::clone(&self.chat)
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn quiz_history(&self) -> Arc<QuizHistoryService> {
        Arc::clone(&self.quiz_history)
    }

    #[must_use]
    pub fn app_settings(&self) -> Arc<AppSettingsService> {
        Arc::clone(&self.app_settings)
    }
}
