use sanderson_core::model::{AttemptId, QuizAttempt};

use super::SqliteRepository;
use super::mapping::{difficulty_to_str, map_attempt_row, map_attempt_row_with_id};
use crate::repository::{QuizAttemptRepository, QuizAttemptRow, StorageError};

#[async_trait::async_trait]
impl QuizAttemptRepository for SqliteRepository {
    async fn append_attempt(&self, attempt: &QuizAttempt) -> Result<AttemptId, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO quiz_attempts (
                    difficulty, started_at, completed_at,
                    score, total_questions, pass_threshold
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(difficulty_to_str(attempt.difficulty()))
        .bind(attempt.started_at())
        .bind(attempt.completed_at())
        .bind(i64::from(attempt.score()))
        .bind(i64::from(attempt.total_questions()))
        .bind(i64::from(attempt.threshold().percent()))
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(AttemptId::new(res.last_insert_rowid()))
    }

    async fn get_attempt(&self, id: AttemptId) -> Result<QuizAttempt, StorageError> {
        let row = sqlx::query(
            r"
                SELECT
                    difficulty, started_at, completed_at,
                    score, total_questions, pass_threshold
                FROM quiz_attempts
                WHERE id = ?1
            ",
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        map_attempt_row(&row)
    }

    async fn list_attempts(&self, limit: u32) -> Result<Vec<QuizAttemptRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, difficulty, started_at, completed_at,
                    score, total_questions, pass_threshold
                FROM quiz_attempts
                ORDER BY completed_at DESC, id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_attempt_row_with_id(&row)?);
        }

        Ok(out)
    }
}
