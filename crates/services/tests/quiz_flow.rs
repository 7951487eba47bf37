use std::num::NonZeroU8;
use std::sync::Arc;

use async_trait::async_trait;
use sanderson_core::model::quiz::{
    ChosenAnswer, Difficulty, OptionIndex, PassThreshold, QuizPhase, QuizQuestionDraft,
    QuizRequest, QuizSession, review_session,
};
use sanderson_core::model::{AppSettings, ImageDataUri, NlpAnalysis};
use sanderson_core::time::fixed_now;
use services::{AiError, AppServices, AssistantBackend, AssistantReply, Clock, QuestionSource};
use storage::repository::Storage;

struct FixedSource;

#[async_trait]
impl QuestionSource for FixedSource {
    async fn fetch_questions(
        &self,
        request: &QuizRequest,
    ) -> Result<Vec<QuizQuestionDraft>, AiError> {
        assert_eq!(request.expected_len(), 3);
        Ok([1, 0, 2]
            .into_iter()
            .enumerate()
            .map(|(i, correct)| {
                QuizQuestionDraft::new(
                    format!("Question {}", i + 1),
                    ["w", "x", "y", "z"],
                    correct,
                    Some("see notes"),
                )
            })
            .collect())
    }
}

struct Offline;

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

fn services() -> AppServices {
    AppServices::with_backends(
        Storage::in_memory(),
        AppSettings::default(),
        Clock::fixed(fixed_now()),
        true,
        Arc::new(FixedSource),
        Arc::new(Offline),
    )
}

fn answer_all(session: &mut QuizSession, picks: [u8; 3]) {
    for (i, pick) in picks.into_iter().enumerate() {
        session.select_option(OptionIndex::new(pick).unwrap()).unwrap();
        if i < 2 {
            assert!(session.go_next());
        }
    }
}

#[tokio::test]
async fn quiz_round_trip_records_history() {
    let app = services();
    let quiz = app.quiz();
    let request = QuizRequest::new(Difficulty::Easy, NonZeroU8::new(3).unwrap());

    let mut session = quiz
        .start_quiz(request, PassThreshold::default())
        .await
        .unwrap();
    answer_all(&mut session, [1, 0, 1]);

    let first = quiz.submit(&mut session).await.unwrap();
    assert_eq!(first.completion.score, 2);
    assert_eq!(first.score.rounded_percentage(), 67);
    assert!(!first.score.passed());
    assert_eq!(session.phase(), QuizPhase::Completed);

    let review = review_session(&session);
    assert_eq!(review.len(), 3);
    assert!(!review[2].is_correct);
    assert_eq!(review[2].chosen, ChosenAnswer::Answered("x".into()));
    assert_eq!(review[2].correct_option_text, "y");

    let mut again = quiz.restart(&session).unwrap();
    assert_eq!(again.current_index(), 0);
    answer_all(&mut again, [1, 0, 2]);
    let second = quiz.submit(&mut again).await.unwrap();
    assert!(second.score.passed());

    let history = app.quiz_history().list_recent(10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(Some(history[0].id), second.attempt_id);
    assert_eq!(history[0].percent, 100);
    assert_eq!(history[1].percent, 67);
    assert!(history.iter().all(|item| item.difficulty == Difficulty::Easy));
}
