use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::quiz::{Difficulty, PassThreshold, QuizScore, QuizSession};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizAttemptError {
    #[error("quiz has not been submitted")]
    NotCompleted,

    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("score {score} exceeds total {total}")]
    ScoreOutOfRange { score: u32, total: u32 },

    #[error("an attempt needs at least one question")]
    NoQuestions,

    #[error("too many questions for a single attempt: {len}")]
    TooManyQuestions { len: usize },
}

/// Persisted record of one completed quiz run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAttempt {
    difficulty: Difficulty,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    score: u32,
    total_questions: u32,
    threshold: PassThreshold,
}

impl QuizAttempt {
    /// Rehydrate an attempt from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `QuizAttemptError` if the time range or counts are inconsistent.
    pub fn from_persisted(
        difficulty: Difficulty,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        score: u32,
        total_questions: u32,
        threshold: PassThreshold,
    ) -> Result<Self, QuizAttemptError> {
        if completed_at < started_at {
            return Err(QuizAttemptError::InvalidTimeRange);
        }
        if total_questions == 0 {
            return Err(QuizAttemptError::NoQuestions);
        }
        if score > total_questions {
            return Err(QuizAttemptError::ScoreOutOfRange {
                score,
                total: total_questions,
            });
        }

        Ok(Self {
            difficulty,
            started_at,
            completed_at,
            score,
            total_questions,
            threshold,
        })
    }

    /// Build an attempt from a submitted session.
    ///
    /// # Errors
    ///
    /// Returns `QuizAttemptError::NotCompleted` if the session is still in progress.
    pub fn from_session(session: &QuizSession) -> Result<Self, QuizAttemptError> {
        let completed_at = session
            .completed_at()
            .ok_or(QuizAttemptError::NotCompleted)?;
        let score = session.score();
        let total = u32::try_from(score.total())
            .map_err(|_| QuizAttemptError::TooManyQuestions { len: score.total() })?;
        let correct = u32::try_from(score.correct())
            .map_err(|_| QuizAttemptError::TooManyQuestions { len: score.total() })?;

        Self::from_persisted(
            session.difficulty(),
            session.started_at(),
            completed_at,
            correct,
            total,
            session.threshold(),
        )
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn threshold(&self) -> PassThreshold {
        self.threshold
    }

    #[must_use]
    pub fn quiz_score(&self) -> QuizScore {
        QuizScore::from_counts(
            self.score as usize,
            self.total_questions as usize,
            self.threshold,
        )
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.quiz_score().passed()
    }
}
