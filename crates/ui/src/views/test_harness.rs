use std::num::NonZeroU8;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use sanderson_core::model::quiz::{
    Difficulty, PassThreshold, QuizQuestionDraft, QuizRequest, QuizSession, validate_question_set,
};
use sanderson_core::model::{ImageDataUri, NlpAnalysis};
use sanderson_core::time::fixed_now;
use services::{
    AiError, AssistantBackend, AssistantReply, ChatService, Clock, QuestionSource,
    QuizHistoryService, QuizService,
};
use storage::repository::{QuizAttemptRepository, Storage};

use crate::context::{UiApp, build_app_context};
use crate::views::{ChatView, HistoryView, QuizPanel, QuizView};
use crate::vm::QuizVm;

pub struct Offline;

#[async_trait]
impl QuestionSource for Offline {
    async fn fetch_questions(
        &self,
        _request: &QuizRequest,
    ) -> Result<Vec<QuizQuestionDraft>, AiError> {
        Err(AiError::Disabled)
    }
}

#[async_trait]
impl AssistantBackend for Offline {
    async fn respond(&self, _query: &str) -> Result<AssistantReply, AiError> {
        Err(AiError::Disabled)
    }
    async fn analyze_image(&self, _image: &ImageDataUri, _q: &str) -> Result<String, AiError> {
        Err(AiError::Disabled)
    }
    async fn analyze_text(&self, _text: &str) -> Result<NlpAnalysis, AiError> {
        Err(AiError::Disabled)
    }
    async fn summarize(&self, _url: &str) -> Result<String, AiError> {
        Err(AiError::Disabled)
    }
    async fn generate_image(&self, _prompt: &str) -> Result<ImageDataUri, AiError> {
        Err(AiError::Disabled)
    }
}

#[derive(Clone)]
struct TestApp {
    chat: Arc<ChatService>,
    quiz: Arc<QuizService>,
    quiz_history: Arc<QuizHistoryService>,
    ai_enabled: bool,
}

impl UiApp for TestApp {
    fn chat(&self) -> Arc<ChatService> {
        Arc::clone(&self.chat)
    }

    fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    fn quiz_history(&self) -> Arc<QuizHistoryService> {
        Arc::clone(&self.quiz_history)
    }

    fn pass_threshold(&self) -> PassThreshold {
        PassThreshold::default()
    }

    fn quiz_length(&self) -> NonZeroU8 {
        NonZeroU8::new(5).unwrap_or(NonZeroU8::MIN)
    }

    fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Chat,
    Quiz,
    History,
    Panel,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app, PathBuf::from("transcript.pdf")));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Chat => rsx! { ChatView {} },
        ViewKind::Quiz => rsx! { QuizView {} },
        ViewKind::History => rsx! { HistoryView {} },
        ViewKind::Panel => rsx! { PanelHost {} },
    }
}

#[component]
fn PanelHost() -> Element {
    let vm = use_signal(|| Some(QuizVm::new(sample_session())));
    rsx! { QuizPanel { vm } }
}

pub fn sample_session() -> QuizSession {
    let drafts = (0..3)
        .map(|i| {
            QuizQuestionDraft::new(
                format!("Sample question {}", i + 1),
                ["alpha", "beta", "gamma", "delta"],
                i,
                Some("because"),
            )
        })
        .collect();
    let questions = validate_question_set(drafts, 3).expect("valid sample");
    QuizSession::new(questions, Difficulty::Hard, PassThreshold::default(), fixed_now())
        .expect("non-empty")
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, ai_enabled: bool) -> ViewHarness {
    let storage = Storage::in_memory();
    let attempts = Arc::clone(&storage.attempts);
    setup_view_harness_with_attempts(view, ai_enabled, storage, attempts)
}

pub fn setup_view_harness_with_attempts(
    view: ViewKind,
    ai_enabled: bool,
    storage: Storage,
    attempts: Arc<dyn QuizAttemptRepository>,
) -> ViewHarness {
    let clock = Clock::fixed(fixed_now());
    let app = Arc::new(TestApp {
        chat: Arc::new(ChatService::new(clock, Arc::new(Offline))),
        quiz: Arc::new(QuizService::new(clock, Arc::new(Offline), Arc::clone(&attempts))),
        quiz_history: Arc::new(QuizHistoryService::new(attempts)),
        ai_enabled,
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });
    ViewHarness { dom, storage }
}
