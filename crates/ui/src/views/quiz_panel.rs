use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::{QuizIntent, QuizResultsVm, QuizVm};

/// Question-by-question quiz card with results and review.
#[component]
pub fn QuizPanel(vm: Signal<Option<QuizVm>>) -> Element {
    let ctx = use_context::<AppContext>();
    let quiz = ctx.quiz();
    let mut vm = vm;
    let mut error = use_signal(|| None::<ViewError>);

    let on_intent = use_callback(move |intent: QuizIntent| {
        if let Some(current) = vm.write().as_mut() {
            current.apply(intent);
        }
    });

    let on_submit = {
        let quiz = quiz.clone();
        use_callback(move |()| {
            let completed = match vm.write().as_mut().map(|current| current.complete(&quiz)) {
                Some(Ok(completed)) => completed,
                Some(Err(err)) => {
                    error.set(Some(err));
                    return;
                }
                None => return,
            };
            error.set(None);
            let quiz = quiz.clone();
            spawn(async move {
                quiz.record(&completed).await;
            });
        })
    };

    let on_restart = use_callback(move |()| {
        let mut guard = vm.write();
        if let Some(current) = guard.as_mut() {
            if let Err(err) = current.restart(&quiz) {
                error.set(Some(err));
            }
        }
    });

    let Some(current) = vm.read().clone() else {
        return rsx! {};
    };

    if let Some(results) = current.results().cloned() {
        return rsx! {
            QuizResults { results, on_restart }
        };
    }

    let question = current.question();
    let progress = current.progress_percent();
    let can_previous = current.can_go_previous();
    let can_next = current.can_go_next();
    let shows_submit = current.shows_submit();
    let can_submit = current.can_submit();

    rsx! {
        section { class: "quiz-card",
            header { class: "quiz-header",
                h3 { "{current.title()}" }
                span { class: "quiz-position", "{question.position_label}" }
            }
            progress { class: "quiz-progress", max: "100", value: "{progress}" }
            p { class: "quiz-question", "{question.text}" }
            ul { class: "quiz-options",
                for option in question.options {
                    li { key: "{option.index.value()}",
                        button {
                            class: if option.selected { "quiz-option quiz-option--selected" } else { "quiz-option" },
                            onclick: move |_| on_intent.call(QuizIntent::Select(option.index)),
                            "{option.text}"
                        }
                    }
                }
            }
            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }
            footer { class: "quiz-actions",
                button {
                    disabled: !can_previous,
                    onclick: move |_| on_intent.call(QuizIntent::Previous),
                    "Previous"
                }
                if shows_submit {
                    button {
                        class: "primary",
                        disabled: !can_submit,
                        onclick: move |_| on_submit.call(()),
                        "Submit Quiz"
                    }
                } else {
                    button {
                        class: "primary",
                        disabled: !can_next,
                        onclick: move |_| on_intent.call(QuizIntent::Next),
                        "Next"
                    }
                }
            }
        }
    }
}

#[component]
fn QuizResults(results: QuizResultsVm, on_restart: Callback<()>) -> Element {
    rsx! {
        section { class: "quiz-card quiz-results",
            h3 { "{results.title}" }
            p { class: if results.passed { "quiz-headline quiz-headline--passed" } else { "quiz-headline" },
                "{results.headline}"
            }
            if let Some(line) = results.encouragement {
                p { class: "quiz-encouragement", "{line}" }
            }
            p { class: "quiz-score", "{results.score_line}" }
            progress { class: "quiz-progress", max: "100", value: "{results.percent}" }
            div { class: "quiz-review",
                h4 { "Review Your Answers:" }
                for (i, row) in results.review.into_iter().enumerate() {
                    div {
                        key: "{i}",
                        class: if row.is_correct { "review-row review-row--correct" } else { "review-row review-row--wrong" },
                        p { class: "review-heading", "{row.heading}" }
                        p { "Your answer: {row.your_answer}" }
                        if let Some(correct) = row.correct_answer {
                            p { class: "review-correct", "Correct answer: {correct}" }
                        }
                        if let Some(explanation) = row.explanation {
                            p { class: "review-explanation", "Explanation: {explanation}" }
                        }
                    }
                }
            }
            footer { class: "quiz-actions",
                button { onclick: move |_| on_restart.call(()), "Retake Same Quiz" }
            }
        }
    }
}
