use dioxus::prelude::*;
use sanderson_core::model::quiz::{Difficulty, QuizRequest};
use services::QuizStartError;

use crate::context::AppContext;
use crate::views::ViewError;
use crate::views::quiz_panel::QuizPanel;
use crate::vm::QuizVm;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StartState {
    Idle,
    Generating,
    Failed(ViewError),
}

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz = ctx.quiz();
    let quiz_length = ctx.quiz_length();
    let threshold = ctx.pass_threshold();

    let mut difficulty = use_signal(Difficulty::default);
    let mut start_state = use_signal(|| StartState::Idle);
    let mut vm = use_signal(|| None::<QuizVm>);

    let start = use_callback(move |()| {
        let quiz = quiz.clone();
        let request = QuizRequest::new(difficulty(), quiz_length);
        start_state.set(StartState::Generating);
        vm.set(None);
        spawn(async move {
            match quiz.start_quiz(request, threshold).await {
                Ok(session) => {
                    vm.set(Some(QuizVm::new(session)));
                    start_state.set(StartState::Idle);
                }
                Err(QuizStartError::GenerationFailed(_)) => {
                    start_state.set(StartState::Failed(ViewError::QuizGeneration));
                }
                Err(_) => start_state.set(StartState::Failed(ViewError::Unknown)),
            }
        });
    });

    let generating = start_state() == StartState::Generating;

    rsx! {
        div { class: "page page--quiz",
            h2 { "Test Your AI Knowledge" }
            div { class: "quiz-setup",
                label { r#for: "difficulty", "Difficulty" }
                select {
                    id: "difficulty",
                    value: "{difficulty().as_str()}",
                    disabled: generating,
                    onchange: move |evt| {
                        if let Some(level) = Difficulty::parse(&evt.value()) {
                            difficulty.set(level);
                        }
                    },
                    for level in Difficulty::ALL {
                        option { value: "{level.as_str()}", "{level.as_str()}" }
                    }
                }
                span { class: "quiz-meta", "{quiz_length} questions, pass mark {threshold}" }
                button {
                    class: "primary",
                    disabled: generating || !ctx.ai_enabled(),
                    onclick: move |_| start.call(()),
                    if generating { "Generating..." } else { "Start Quiz" }
                }
            }
            if !ctx.ai_enabled() {
                p { class: "hint", "Set SANDERSON_AI_API_KEY to generate quizzes." }
            }
            match start_state() {
                StartState::Failed(err) => rsx! {
                    div { class: "error",
                        p { "{err.message()}" }
                        button { onclick: move |_| start.call(()), "Retry" }
                    }
                },
                StartState::Generating => rsx! {
                    p { "Generating your quiz..." }
                },
                StartState::Idle => rsx! {
                    QuizPanel { vm }
                },
            }
        }
    }
}
