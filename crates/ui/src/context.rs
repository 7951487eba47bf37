use std::num::NonZeroU8;
use std::path::PathBuf;
use std::sync::Arc;

use sanderson_core::model::quiz::PassThreshold;
use services::{AppServices, ChatService, QuizHistoryService, QuizService};

pub trait UiApp: Send + Sync {
    fn chat(&self) -> Arc<ChatService>;
    fn quiz(&self) -> Arc<QuizService>;
    fn quiz_history(&self) -> Arc<QuizHistoryService>;

    fn pass_threshold(&self) -> PassThreshold;
    fn quiz_length(&self) -> NonZeroU8;
    fn ai_enabled(&self) -> bool;
}

impl UiApp for AppServices {
    fn chat(&self) -> Arc<ChatService> {
        AppServices::chat(self)
    }

    fn quiz(&self) -> Arc<QuizService> {
        AppServices::quiz(self)
    }

    fn quiz_history(&self) -> Arc<QuizHistoryService> {
        AppServices::quiz_history(self)
    }

    fn pass_threshold(&self) -> PassThreshold {
        self.settings().pass_threshold()
    }

    fn quiz_length(&self) -> NonZeroU8 {
        self.settings().quiz_length()
    }

    fn ai_enabled(&self) -> bool {
        AppServices::ai_enabled(self)
    }
}

#[derive(Clone)]
pub struct AppContext {
    pass_threshold: PassThreshold,
    quiz_length: NonZeroU8,
    ai_enabled: bool,
    transcript_path: PathBuf,

    chat: Arc<ChatService>,
    quiz: Arc<QuizService>,
    quiz_history: Arc<QuizHistoryService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>, transcript_path: PathBuf) -> Self {
        Self {
            pass_threshold: app.pass_threshold(),
            quiz_length: app.quiz_length(),
            ai_enabled: app.ai_enabled(),
            transcript_path,
            chat: app.chat(),
            quiz: app.quiz(),
            quiz_history: app.quiz_history(),
        }
    }

    #[must_use]
    pub fn pass_threshold(&self) -> PassThreshold {
        self.pass_threshold
    }

    #[must_use]
    pub fn quiz_length(&self) -> NonZeroU8 {
        self.quiz_length
    }

    #[must_use]
    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }

    /// Where "Export chat" writes the transcript.
    #[must_use]
    pub fn transcript_path(&self) -> PathBuf {
        self.transcript_path.clone()
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
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>, transcript_path: PathBuf) -> AppContext {
    AppContext::new(app, transcript_path)
}
