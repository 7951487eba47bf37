use std::sync::Arc;

use sanderson_core::model::quiz::{
    Difficulty, PassThreshold, QuizCompletion, QuizQuestion, QuizRequest, QuizScore, QuizSession,
    QuizSessionError, question_for_topic, validate_question_set,
};
use sanderson_core::model::{AttemptId, QuizAttempt};
use storage::repository::QuizAttemptRepository;
use tracing::{info, instrument, warn};

use crate::Clock;
use crate::error::{GenerationAttempts, GenerationFailure, QuizStartError};
use crate::question_source::QuestionSource;

/// Result of submitting a quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSubmission {
    pub completion: QuizCompletion,
    pub score: QuizScore,
    /// `None` when the attempt could not be saved; the quiz result still stands.
    pub attempt_id: Option<AttemptId>,
}

/// Starts, submits, and restarts quiz sessions.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    attempts: Arc<dyn QuizAttemptRepository>,
}

impl QuizService {
    #[must_use]
    pub fn new(
        clock: Clock,
        source: Arc<dyn QuestionSource>,
        attempts: Arc<dyn QuizAttemptRepository>,
    ) -> Self {
        Self {
            clock,
            source,
            attempts,
        }
    }

    /// Generate and validate a full question set, retrying once on any failure.
    ///
    /// # Errors
    ///
    /// Returns `QuizStartError::GenerationFailed` with both failures when the retry
    /// also fails. No partial quiz is produced.
    #[instrument(skip(self), fields(difficulty = %request.difficulty, count = request.expected_len()))]
    pub async fn start_quiz(
        &self,
        request: QuizRequest,
        threshold: PassThreshold,
    ) -> Result<QuizSession, QuizStartError> {
        let questions = match self.generate(&request).await {
            Ok(questions) => questions,
            Err(first) => {
                warn!(error = %first, "quiz generation unusable, retrying once");
                match self.generate(&request).await {
                    Ok(questions) => questions,
                    Err(retry) => {
                        warn!(error = %retry, "quiz generation retry failed");
                        return Err(QuizStartError::GenerationFailed(Box::new(
                            GenerationAttempts { first, retry },
                        )));
                    }
                }
            }
        };

        info!("quiz ready");
        Ok(QuizSession::new(
            questions,
            request.difficulty,
            threshold,
            self.clock.now(),
        )?)
    }

    async fn generate(&self, request: &QuizRequest) -> Result<Vec<QuizQuestion>, GenerationFailure> {
        let drafts = self.source.fetch_questions(request).await?;
        Ok(validate_question_set(drafts, request.expected_len())?)
    }

    /// One-question quiz about `topic`, served from the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns `QuizStartError` only if a catalog entry is malformed.
    pub fn single_question(
        &self,
        topic: &str,
        threshold: PassThreshold,
    ) -> Result<QuizSession, QuizStartError> {
        let question = question_for_topic(topic)?;
        Ok(QuizSession::new(
            vec![question],
            Difficulty::Easy,
            threshold,
            self.clock.now(),
        )?)
    }

    /// Submit the session and record the attempt.
    ///
    /// Persistence failures are logged and reported as `attempt_id: None`.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError` when the session cannot be submitted; the session
    /// is left unchanged.
    pub async fn submit(
        &self,
        session: &mut QuizSession,
    ) -> Result<QuizSubmission, QuizSessionError> {
        let completion = self.complete(session)?;
        let attempt_id = self.record(session).await;
        Ok(QuizSubmission {
            completion,
            score: session.score(),
            attempt_id,
        })
    }

    /// Submit the session in place without touching storage.
    ///
    /// Once this succeeds the session is `Completed`, so a second call fails and the
    /// completion is produced only once. Follow with [`QuizService::record`].
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError` when the session cannot be submitted; the session
    /// is left unchanged.
    pub fn complete(&self, session: &mut QuizSession) -> Result<QuizCompletion, QuizSessionError> {
        let completion = session.submit(self.clock.now())?;
        info!(
            score = completion.score,
            total = completion.total_questions,
            passed = session.score().passed(),
            "quiz submitted"
        );
        Ok(completion)
    }

    /// Save a completed session to history.
    ///
    /// Returns `None` and logs when the session is not completed or the save fails.
    pub async fn record(&self, session: &QuizSession) -> Option<AttemptId> {
        let attempt = match QuizAttempt::from_session(session) {
            Ok(attempt) => attempt,
            Err(err) => {
                warn!(error = %err, "quiz could not be recorded");
                return None;
            }
        };
        match self.attempts.append_attempt(&attempt).await {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(error = %err, "failed to save quiz attempt");
                None
            }
        }
    }

    /// Fresh run over the same questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::NotCompleted` while the quiz is still running.
    pub fn restart(&self, session: &QuizSession) -> Result<QuizSession, QuizSessionError> {
        session.restart(self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AiError;
    use async_trait::async_trait;
    use sanderson_core::model::quiz::{OptionIndex, QuestionSetError, QuizQuestionDraft};
    use sanderson_core::time::fixed_now;
    use std::collections::VecDeque;
    use std::num::NonZeroU8;
    use std::sync::Mutex;
    use storage::repository::InMemoryRepository;

    struct ScriptedSource {
        replies: Mutex<VecDeque<Result<Vec<QuizQuestionDraft>, AiError>>>,
        calls: Mutex<usize>,
    }

    impl ScriptedSource {
        fn new(replies: Vec<Result<Vec<QuizQuestionDraft>, AiError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl QuestionSource for ScriptedSource {
        async fn fetch_questions(
            &self,
            _request: &QuizRequest,
        ) -> Result<Vec<QuizQuestionDraft>, AiError> {
            *self.calls.lock().unwrap() += 1;
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(AiError::EmptyResponse))
        }
    }

    fn drafts(n: usize) -> Vec<QuizQuestionDraft> {
        (0..n)
            .map(|i| {
                QuizQuestionDraft::new(format!("Q{i}"), ["a", "b", "c", "d"], 1, Some("because"))
            })
            .collect()
    }

    fn request(n: u8) -> QuizRequest {
        QuizRequest::new(Difficulty::Medium, NonZeroU8::new(n).unwrap())
    }

    fn service(source: Arc<ScriptedSource>) -> (QuizService, InMemoryRepository) {
        let repo = InMemoryRepository::new();
        let svc = QuizService::new(Clock::fixed(fixed_now()), source, Arc::new(repo.clone()));
        (svc, repo)
    }

    #[tokio::test]
    async fn valid_first_reply_needs_no_retry() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(drafts(3))]));
        let (svc, _) = service(Arc::clone(&source));

        let session = svc.start_quiz(request(3), PassThreshold::default()).await.unwrap();
        assert_eq!(session.total_questions(), 3);
        assert_eq!(session.difficulty(), Difficulty::Medium);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn short_reply_is_retried_once() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(drafts(2)), Ok(drafts(3))]));
        let (svc, _) = service(Arc::clone(&source));

        let session = svc.start_quiz(request(3), PassThreshold::default()).await.unwrap();
        assert_eq!(session.total_questions(), 3);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn transport_error_then_malformed_fails_with_both() {
        let mut bad = drafts(3);
        bad[1].correct_option_index = 4;
        let source = Arc::new(ScriptedSource::new(vec![Err(AiError::Disabled), Ok(bad)]));
        let (svc, _) = service(Arc::clone(&source));

        let err = svc
            .start_quiz(request(3), PassThreshold::default())
            .await
            .unwrap_err();
        assert_eq!(source.calls(), 2);
        let QuizStartError::GenerationFailed(attempts) = err else {
            panic!("expected GenerationFailed, got {err:?}");
        };
        assert!(matches!(
            attempts.first,
            GenerationFailure::Source(AiError::Disabled)
        ));
        assert!(matches!(
            attempts.retry,
            GenerationFailure::InvalidSet(QuestionSetError::Malformed { index: 1, .. })
        ));
    }

    #[tokio::test]
    async fn submit_records_attempt_once() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(drafts(2))]));
        let (svc, repo) = service(source);
        let mut session = svc.start_quiz(request(2), PassThreshold::default()).await.unwrap();

        session.select_option(OptionIndex::new(1).unwrap()).unwrap();
        session.go_next();
        session.select_option(OptionIndex::new(0).unwrap()).unwrap();

        let submission = svc.submit(&mut session).await.unwrap();
        assert_eq!(submission.completion.score, 1);
        assert_eq!(submission.completion.total_questions, 2);
        assert!(!submission.score.passed());
        let id = submission.attempt_id.expect("attempt saved");

        assert!(matches!(
            svc.submit(&mut session).await,
            Err(QuizSessionError::Completed)
        ));
        let rows = storage::repository::QuizAttemptRepository::list_attempts(&repo, 10)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
    }

    #[tokio::test]
    async fn completing_twice_records_one_attempt() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(drafts(1))]));
        let (svc, repo) = service(source);
        let mut session = svc.start_quiz(request(1), PassThreshold::default()).await.unwrap();
        session.select_option(OptionIndex::new(1).unwrap()).unwrap();

        let completion = svc.complete(&mut session).unwrap();
        assert_eq!(completion.score, 1);
        assert!(matches!(
            svc.complete(&mut session),
            Err(QuizSessionError::Completed)
        ));
        assert!(svc.record(&session).await.is_some());

        let rows = storage::repository::QuizAttemptRepository::list_attempts(&repo, 10)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn running_session_is_not_recorded() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(drafts(2))]));
        let (svc, repo) = service(source);
        let session = svc.start_quiz(request(2), PassThreshold::default()).await.unwrap();

        assert_eq!(svc.record(&session).await, None);
        let rows = storage::repository::QuizAttemptRepository::list_attempts(&repo, 10)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn single_question_quiz_uses_catalog() {
        let (svc, _) = service(Arc::new(ScriptedSource::new(Vec::new())));
        let mut session = svc
            .single_question("Generative AI creates images", PassThreshold::default())
            .unwrap();
        assert_eq!(session.total_questions(), 1);
        assert!(!session.can_submit());

        session.select_option(OptionIndex::new(2).unwrap()).unwrap();
        let submission = svc.submit(&mut session).await.unwrap();
        assert!(submission.score.passed());

        let again = svc.restart(&session).unwrap();
        assert_eq!(again.answered_count(), 0);
    }
}
