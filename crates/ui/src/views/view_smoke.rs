use chrono::Duration;
use sanderson_core::model::quiz::{Difficulty, PassThreshold};
use sanderson_core::model::{AttemptId, QuizAttempt};
use sanderson_core::time::fixed_now;
use storage::repository::{QuizAttemptRepository, QuizAttemptRow, Storage, StorageError};

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_attempts};

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_attempt() {
    let mut harness = setup_view_harness(ViewKind::History, true);
    let attempt = QuizAttempt::from_persisted(
        Difficulty::Hard,
        fixed_now(),
        fixed_now() + Duration::minutes(3),
        4,
        5,
        PassThreshold::default(),
    )
    .unwrap();
    harness
        .storage
        .attempts
        .append_attempt(&attempt)
        .await
        .expect("append attempt");

    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Quiz History"), "missing title in {html}");
    assert!(html.contains("4 / 5 (80%)"), "missing score in {html}");
    assert!(html.contains("Passed"), "missing outcome in {html}");
}

struct FailingAttempts;

#[async_trait::async_trait]
impl QuizAttemptRepository for FailingAttempts {
    async fn append_attempt(&self, _attempt: &QuizAttempt) -> Result<AttemptId, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn get_attempt(&self, _id: AttemptId) -> Result<QuizAttempt, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn list_attempts(&self, _limit: u32) -> Result<Vec<QuizAttemptRow>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_error_state() {
    let mut harness = setup_view_harness_with_attempts(
        ViewKind::History,
        true,
        Storage::in_memory(),
        std::sync::Arc::new(FailingAttempts),
    );
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn chat_view_smoke_renders_empty_state() {
    let mut harness = setup_view_harness(ViewKind::Chat, false);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Chat with Christian"), "missing title in {html}");
    assert!(html.contains("Ask Christian anything"), "missing empty state in {html}");
    assert!(html.contains("SANDERSON_AI_API_KEY"), "missing config hint in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn chat_view_smoke_offers_composer_tools() {
    let mut harness = setup_view_harness(ViewKind::Chat, true);
    harness.rebuild();
    let html = harness.render();
    for label in ["Generate Image", "Summarize Article", "Analyze Text"] {
        assert!(html.contains(label), "missing {label} in {html}");
    }
    assert!(html.contains("chat-tool"), "missing tool buttons in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_setup() {
    let mut harness = setup_view_harness(ViewKind::Quiz, true);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Start Quiz"), "missing start in {html}");
    assert!(html.contains("Medium"), "missing difficulty in {html}");
    assert!(html.contains("5 questions, pass mark 70%"), "missing meta in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_panel_smoke_renders_first_question() {
    let mut harness = setup_view_harness(ViewKind::Panel, true);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("AI Quiz (Hard)"), "missing title in {html}");
    assert!(html.contains("Question 1 of 3"), "missing position in {html}");
    assert!(html.contains("Sample question 1"), "missing text in {html}");
    assert!(html.contains("Next"), "missing next in {html}");
}
