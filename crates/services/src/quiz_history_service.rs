use std::sync::Arc;

use chrono::{DateTime, Utc};
use sanderson_core::model::quiz::Difficulty;
use sanderson_core::model::{AttemptId, QuizAttempt};
use storage::repository::QuizAttemptRepository;

use crate::error::QuizHistoryError;

/// One line of the quiz history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAttemptListItem {
    pub id: AttemptId,
    pub difficulty: Difficulty,
    pub completed_at: DateTime<Utc>,
    pub score: u32,
    pub total_questions: u32,
    pub percent: u8,
    pub passed: bool,
}

impl QuizAttemptListItem {
    #[must_use]
    pub fn from_attempt(id: AttemptId, attempt: &QuizAttempt) -> Self {
        Self {
            id,
            difficulty: attempt.difficulty(),
            completed_at: attempt.completed_at(),
            score: attempt.score(),
            total_questions: attempt.total_questions(),
            percent: attempt.quiz_score().rounded_percentage(),
            passed: attempt.passed(),
        }
    }
}

/// Read access to recorded quiz attempts.
#[derive(Clone)]
pub struct QuizHistoryService {
    attempts: Arc<dyn QuizAttemptRepository>,
}

impl QuizHistoryService {
    #[must_use]
    pub fn new(attempts: Arc<dyn QuizAttemptRepository>) -> Self {
        Self { attempts }
    }

    /// Recent attempts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `QuizHistoryError` on storage failures.
    pub async fn list_recent(
        &self,
        limit: u32,
    ) -> Result<Vec<QuizAttemptListItem>, QuizHistoryError> {
        let rows = self.attempts.list_attempts(limit).await?;
        Ok(rows
            .iter()
            .map(|row| QuizAttemptListItem::from_attempt(row.id, &row.attempt))
            .collect())
    }

    /// Fetch one attempt.
    ///
    /// # Errors
    ///
    /// Returns `QuizHistoryError` if missing or on storage failures.
    pub async fn get(&self, id: AttemptId) -> Result<QuizAttempt, QuizHistoryError> {
        Ok(self.attempts.get_attempt(id).await?)
    }
}
