use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::question::{Difficulty, OptionIndex, QuizQuestion};
use super::scoring::{PassThreshold, QuizScore};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// A transition that the current session state does not allow.
///
/// The UI is expected to disable the matching control, so these surface only
/// when a caller skips the `can_*` guards.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSessionError {
    #[error("a quiz needs at least one question")]
    Empty,

    #[error("quiz already completed")]
    Completed,

    #[error("quiz is still in progress")]
    NotCompleted,

    #[error("submit is only available on the last question")]
    NotOnLastQuestion,

    #[error("{missing} question(s) still unanswered")]
    Unanswered { missing: usize },

    #[error("inconsistent quiz session: {0}")]
    Inconsistent(&'static str),
}

//
// ─── PHASE / SNAPSHOT ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizPhase {
    InProgress,
    Completed,
}

/// Payload handed to whoever listens for completion. Produced exactly once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizCompletion {
    pub score: usize,
    pub total_questions: usize,
}

/// Read-only view of the session for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSnapshot<'a> {
    pub current_question: &'a QuizQuestion,
    pub current_index: usize,
    pub total_questions: usize,
    pub current_answer: Option<OptionIndex>,
    pub answered_count: usize,
    pub phase: QuizPhase,
}

//
// ─── SESSION ──────────────────────────────────────────────────────────────────
//

/// One run through a fixed, ordered set of questions.
///
/// Questions are shared with any session produced by [`QuizSession::restart`];
/// answers and position belong to this run only.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuizSessionRepr")]
pub struct QuizSession {
    questions: Arc<[QuizQuestion]>,
    difficulty: Difficulty,
    threshold: PassThreshold,
    current_index: usize,
    answers: Vec<Option<OptionIndex>>,
    phase: QuizPhase,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// # Errors
    ///
    /// Returns `QuizSessionError::Empty` if `questions` is empty.
    pub fn new(
        questions: Vec<QuizQuestion>,
        difficulty: Difficulty,
        threshold: PassThreshold,
        started_at: DateTime<Utc>,
    ) -> Result<Self, QuizSessionError> {
        if questions.is_empty() {
            return Err(QuizSessionError::Empty);
        }
        Ok(Self::fresh(questions.into(), difficulty, threshold, started_at))
    }

    fn fresh(
        questions: Arc<[QuizQuestion]>,
        difficulty: Difficulty,
        threshold: PassThreshold,
        started_at: DateTime<Utc>,
    ) -> Self {
        let answers = vec![None; questions.len()];
        Self {
            questions,
            difficulty,
            threshold,
            current_index: 0,
            answers,
            phase: QuizPhase::InProgress,
            started_at,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<OptionIndex>] {
        &self.answers
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn threshold(&self) -> PassThreshold {
        self.threshold
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == QuizPhase::Completed
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn current_question(&self) -> &QuizQuestion {
        &self.questions[self.current_index]
    }

    #[must_use]
    pub fn current_answer(&self) -> Option<OptionIndex> {
        self.answers[self.current_index]
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|answer| answer.is_some()).count()
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot<'_> {
        QuizSnapshot {
            current_question: self.current_question(),
            current_index: self.current_index,
            total_questions: self.total_questions(),
            current_answer: self.current_answer(),
            answered_count: self.answered_count(),
            phase: self.phase,
        }
    }

    // ─── guards ───────────────────────────────────────────────────────────────

    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.phase == QuizPhase::InProgress && !self.is_last_question()
    }

    #[must_use]
    pub fn can_go_previous(&self) -> bool {
        self.phase == QuizPhase::InProgress && self.current_index > 0
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.phase == QuizPhase::InProgress
            && self.is_last_question()
            && self.answers.iter().all(Option::is_some)
    }

    // ─── transitions ──────────────────────────────────────────────────────────

    /// Record an answer for the current question, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Completed` once the quiz has been submitted.
    pub fn select_option(&mut self, option: OptionIndex) -> Result<(), QuizSessionError> {
        if self.is_completed() {
            return Err(QuizSessionError::Completed);
        }
        self.answers[self.current_index] = Some(option);
        Ok(())
    }

    /// Move forward one question. Returns `false` (and changes nothing) at the end
    /// or after completion.
    pub fn go_next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.current_index += 1;
        true
    }

    /// Move back one question. Returns `false` (and changes nothing) at the start
    /// or after completion.
    pub fn go_previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.current_index -= 1;
        true
    }

    /// Finish the quiz. The session is left untouched on error.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Completed` if already submitted,
    /// `QuizSessionError::NotOnLastQuestion` if the last question is not current, or
    /// `QuizSessionError::Unanswered` if any answer slot is still empty.
    pub fn submit(&mut self, completed_at: DateTime<Utc>) -> Result<QuizCompletion, QuizSessionError> {
        if self.is_completed() {
            return Err(QuizSessionError::Completed);
        }
        if !self.is_last_question() {
            return Err(QuizSessionError::NotOnLastQuestion);
        }
        let missing = self.answers.len() - self.answered_count();
        if missing > 0 {
            return Err(QuizSessionError::Unanswered { missing });
        }

        self.phase = QuizPhase::Completed;
        self.completed_at = Some(completed_at);

        let score = self.score();
        Ok(QuizCompletion {
            score: score.correct(),
            total_questions: score.total(),
        })
    }

    /// Start over with the same questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::NotCompleted` while the quiz is still running.
    pub fn restart(&self, started_at: DateTime<Utc>) -> Result<Self, QuizSessionError> {
        if !self.is_completed() {
            return Err(QuizSessionError::NotCompleted);
        }
        Ok(Self::fresh(
            Arc::clone(&self.questions),
            self.difficulty,
            self.threshold,
            started_at,
        ))
    }

    /// Score the current answers against this session's threshold.
    #[must_use]
    pub fn score(&self) -> QuizScore {
        QuizScore::compute(&self.questions, &self.answers, self.threshold)
    }
}

/// Serialized shape of a session, checked before it becomes a [`QuizSession`].
#[derive(Deserialize)]
struct QuizSessionRepr {
    questions: Arc<[QuizQuestion]>,
    difficulty: Difficulty,
    threshold: PassThreshold,
    current_index: usize,
    answers: Vec<Option<OptionIndex>>,
    phase: QuizPhase,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<QuizSessionRepr> for QuizSession {
    type Error = QuizSessionError;

    fn try_from(repr: QuizSessionRepr) -> Result<Self, Self::Error> {
        let total = repr.questions.len();
        if total == 0 {
            return Err(QuizSessionError::Empty);
        }
        if repr.answers.len() != total {
            return Err(QuizSessionError::Inconsistent(
                "answer slots do not match the question count",
            ));
        }
        if repr.current_index >= total {
            return Err(QuizSessionError::Inconsistent("current question is out of range"));
        }
        match repr.phase {
            QuizPhase::Completed => {
                if repr.answers.iter().any(Option::is_none) {
                    return Err(QuizSessionError::Inconsistent(
                        "completed quiz has unanswered questions",
                    ));
                }
                if repr.completed_at.is_none() {
                    return Err(QuizSessionError::Inconsistent(
                        "completed quiz has no completion time",
                    ));
                }
            }
            QuizPhase::InProgress => {
                if repr.completed_at.is_some() {
                    return Err(QuizSessionError::Inconsistent(
                        "running quiz has a completion time",
                    ));
                }
            }
        }

        Ok(Self {
            questions: repr.questions,
            difficulty: repr.difficulty,
            threshold: repr.threshold,
            current_index: repr.current_index,
            answers: repr.answers,
            phase: repr.phase,
            started_at: repr.started_at,
            completed_at: repr.completed_at,
        })
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("difficulty", &self.difficulty)
            .field("current_index", &self.current_index)
            .field("answers", &self.answers)
            .field("phase", &self.phase)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::quiz::QuizQuestionDraft;
    use crate::time::fixed_now;

    fn question(correct: i64) -> QuizQuestion {
        QuizQuestionDraft::new(
            format!("Question with answer {correct}"),
            ["a", "b", "c", "d"],
            correct,
            None,
        )
        .validate()
        .unwrap()
    }

    fn session(correct: &[i64]) -> QuizSession {
        let questions = correct.iter().map(|c| question(*c)).collect();
        QuizSession::new(questions, Difficulty::Easy, PassThreshold::default(), fixed_now())
            .unwrap()
    }

    fn idx(value: u8) -> OptionIndex {
        OptionIndex::new(value).unwrap()
    }

    fn answer_all(session: &mut QuizSession, answers: &[u8]) {
        for (i, answer) in answers.iter().enumerate() {
            session.select_option(idx(*answer)).unwrap();
            if i + 1 < answers.len() {
                assert!(session.go_next());
            }
        }
    }

    #[test]
    fn empty_session_is_rejected() {
        let err = QuizSession::new(
            Vec::new(),
            Difficulty::Easy,
            PassThreshold::default(),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, QuizSessionError::Empty);
    }

    #[test]
    fn new_session_starts_at_first_question_unanswered() {
        let s = session(&[1, 0, 2]);
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.phase(), QuizPhase::InProgress);
        assert_eq!(s.answers(), &[None, None, None]);
        assert!(!s.can_go_previous());
        assert!(s.can_go_next());
        assert!(!s.can_submit());
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut s = session(&[1, 0, 2]);
        assert!(!s.go_previous());
        assert_eq!(s.current_index(), 0);

        assert!(s.go_next());
        assert!(s.go_next());
        assert_eq!(s.current_index(), 2);
        assert!(!s.go_next());
        assert_eq!(s.current_index(), 2);

        assert!(s.go_previous());
        assert_eq!(s.current_index(), 1);
    }

    #[test]
    fn navigation_does_not_require_answers() {
        let mut s = session(&[1, 0, 2]);
        assert!(s.go_next());
        assert!(s.go_next());
        assert!(s.is_last_question());
        assert_eq!(s.answered_count(), 0);
    }

    #[test]
    fn selecting_twice_is_idempotent_and_later_choice_wins() {
        let mut s = session(&[1, 0, 2]);
        s.select_option(idx(3)).unwrap();
        s.select_option(idx(3)).unwrap();
        assert_eq!(s.current_answer(), Some(idx(3)));

        s.select_option(idx(1)).unwrap();
        assert_eq!(s.current_answer(), Some(idx(1)));
        assert_eq!(s.answered_count(), 1);
    }

    #[test]
    fn submit_with_unset_slot_keeps_session_in_progress() {
        let mut s = session(&[1, 0, 2]);
        s.select_option(idx(1)).unwrap();
        s.go_next();
        s.select_option(idx(0)).unwrap();
        s.go_next();

        assert!(!s.can_submit());
        let err = s.submit(fixed_now()).unwrap_err();
        assert_eq!(err, QuizSessionError::Unanswered { missing: 1 });
        assert_eq!(s.phase(), QuizPhase::InProgress);
        assert_eq!(s.completed_at(), None);
    }

    #[test]
    fn submit_before_last_question_is_rejected() {
        let mut s = session(&[1, 0]);
        s.select_option(idx(1)).unwrap();
        s.go_next();
        s.select_option(idx(0)).unwrap();
        s.go_previous();

        assert_eq!(
            s.submit(fixed_now()).unwrap_err(),
            QuizSessionError::NotOnLastQuestion
        );
        assert_eq!(s.phase(), QuizPhase::InProgress);
    }

    #[test]
    fn submit_completes_once_and_freezes_answers() {
        let mut s = session(&[1, 0, 2]);
        answer_all(&mut s, &[1, 0, 1]);
        assert!(s.can_submit());

        let completion = s.submit(fixed_now()).unwrap();
        assert_eq!(
            completion,
            QuizCompletion {
                score: 2,
                total_questions: 3
            }
        );
        assert!(s.is_completed());

        assert_eq!(s.submit(fixed_now()).unwrap_err(), QuizSessionError::Completed);
        assert_eq!(
            s.select_option(idx(2)).unwrap_err(),
            QuizSessionError::Completed
        );
        assert!(!s.go_previous());
        assert_eq!(s.answers(), &[Some(idx(1)), Some(idx(0)), Some(idx(1))]);
    }

    #[test]
    fn restart_requires_completion_and_resets_state() {
        let mut s = session(&[1, 0, 2]);
        assert_eq!(
            s.restart(fixed_now()).unwrap_err(),
            QuizSessionError::NotCompleted
        );

        answer_all(&mut s, &[1, 0, 2]);
        s.submit(fixed_now()).unwrap();

        let fresh = s.restart(fixed_now()).unwrap();
        assert_eq!(fresh.current_index(), 0);
        assert_eq!(fresh.phase(), QuizPhase::InProgress);
        assert!(fresh.answers().iter().all(Option::is_none));
        assert_eq!(fresh.questions(), s.questions());
        assert_eq!(fresh.difficulty(), Difficulty::Easy);
    }

    #[test]
    fn snapshot_reflects_current_question() {
        let mut s = session(&[1, 0, 2]);
        s.go_next();
        s.select_option(idx(2)).unwrap();

        let snap = s.snapshot();
        assert_eq!(snap.current_index, 1);
        assert_eq!(snap.total_questions, 3);
        assert_eq!(snap.current_answer, Some(idx(2)));
        assert_eq!(snap.answered_count, 1);
        assert_eq!(snap.phase, QuizPhase::InProgress);
        assert_eq!(snap.current_question.correct_option(), idx(0));
    }

    #[test]
    fn session_serializes_as_plain_value() {
        let mut s = session(&[3]);
        s.select_option(idx(3)).unwrap();
        let json = serde_json::to_string(&s).unwrap();
        let back: QuizSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    fn decode_with(s: &QuizSession, edit: impl FnOnce(&mut serde_json::Value)) -> String {
        let mut value = serde_json::to_value(s).unwrap();
        edit(&mut value);
        serde_json::from_value::<QuizSession>(value)
            .unwrap_err()
            .to_string()
    }

    #[test]
    fn deserialize_rejects_inconsistent_sessions() {
        let s = session(&[3]);

        let err = decode_with(&s, |v| v["current_index"] = 5.into());
        assert!(err.contains("current question is out of range"), "{err}");

        let err = decode_with(&s, |v| v["answers"] = serde_json::json!([null, null]));
        assert!(err.contains("answer slots"), "{err}");

        let err = decode_with(&s, |v| {
            v["questions"] = serde_json::json!([]);
            v["answers"] = serde_json::json!([]);
        });
        assert!(err.contains("at least one question"), "{err}");

        let err = decode_with(&s, |v| {
            v["phase"] = "Completed".into();
            v["completed_at"] = serde_json::to_value(fixed_now()).unwrap();
        });
        assert!(err.contains("unanswered"), "{err}");
    }

    #[test]
    fn completed_session_survives_a_round_trip() {
        let mut s = session(&[1, 0]);
        answer_all(&mut s, &[1, 2]);
        s.submit(fixed_now()).unwrap();

        let json = serde_json::to_string(&s).unwrap();
        let back: QuizSession = serde_json::from_str(&json).unwrap();
        assert!(back.is_completed());
        assert_eq!(back.score().correct(), 1);
        assert!(back.restart(fixed_now()).is_ok());
    }
}
