use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizAttemptCardVm, map_quiz_attempt_cards};

#[derive(Clone, Debug, PartialEq)]
struct HistoryData {
    cards: Vec<QuizAttemptCardVm>,
}

#[component]
pub fn HistoryView() -> Element {
    let ctx = use_context::<AppContext>();
    let history = ctx.quiz_history();

    let mut resource = use_resource(move || {
        let history = history.clone();
        async move {
            let items = history
                .list_recent(20)
                .await
                .map_err(|_| ViewError::Unknown)?;
            let cards = map_quiz_attempt_cards(&items);
            Ok(HistoryData { cards })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Quiz History" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    if data.cards.is_empty() {
                        p { "No quizzes taken yet." }
                    } else {
                        ul { class: "attempt-list",
                            for card in data.cards {
                                AttemptCard { card }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button { onclick: move |_| resource.restart(), "Retry" }
                },
            }
        }
    }
}

#[component]
fn AttemptCard(card: QuizAttemptCardVm) -> Element {
    rsx! {
        li { class: if card.passed { "attempt attempt--passed" } else { "attempt" },
            span { class: "attempt-date", "{card.completed_at_str}" }
            span { class: "attempt-difficulty", "{card.difficulty}" }
            span { class: "attempt-score", "{card.score_label}" }
            span { class: "attempt-outcome", "{card.outcome_label}" }
        }
    }
}
