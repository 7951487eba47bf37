use async_trait::async_trait;
use sanderson_core::model::{AppSettings, AttemptId, QuizAttempt};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A stored attempt together with its storage identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAttemptRow {
    pub id: AttemptId,
    pub attempt: QuizAttempt,
}

impl QuizAttemptRow {
    #[must_use]
    pub fn new(id: AttemptId, attempt: QuizAttempt) -> Self {
        Self { id, attempt }
    }
}

/// Repository contract for the single settings record.
#[async_trait]
pub trait AppSettingsRepository: Send + Sync {
    /// Load settings, or `None` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails or stored values are invalid.
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError>;

    /// Replace the stored settings.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the settings cannot be stored.
    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError>;
}

/// Repository contract for completed quiz attempts.
#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    /// Append a completed attempt and return its identifier.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the attempt cannot be stored.
    async fn append_attempt(&self, attempt: &QuizAttempt) -> Result<AttemptId, StorageError>;

    /// Fetch a single attempt.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_attempt(&self, id: AttemptId) -> Result<QuizAttempt, StorageError>;

    /// List attempts newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails or a row is invalid.
    async fn list_attempts(&self, limit: u32) -> Result<Vec<QuizAttemptRow>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    settings: Arc<Mutex<Option<AppSettings>>>,
    attempts: Arc<Mutex<Vec<QuizAttemptRow>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppSettingsRepository for InMemoryRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        let mut guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(settings.clone());
        Ok(())
    }
}

#[async_trait]
impl QuizAttemptRepository for InMemoryRepository {
    async fn append_attempt(&self, attempt: &QuizAttempt) -> Result<AttemptId, StorageError> {
        let mut guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let next = i64::try_from(guard.len() + 1)
            .map_err(|_| StorageError::Serialization("attempt id overflow".into()))?;
        let id = AttemptId::new(next);
        guard.push(QuizAttemptRow::new(id, attempt.clone()));
        Ok(id)
    }

    async fn get_attempt(&self, id: AttemptId) -> Result<QuizAttempt, StorageError> {
        let guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .iter()
            .find(|row| row.id == id)
            .map(|row| row.attempt.clone())
            .ok_or(StorageError::NotFound)
    }

    async fn list_attempts(&self, limit: u32) -> Result<Vec<QuizAttemptRow>, StorageError> {
        let guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows = guard.clone();
        rows.sort_by(|a, b| {
            b.attempt
                .completed_at()
                .cmp(&a.attempt.completed_at())
                .then(b.id.cmp(&a.id))
        });
        rows.truncate(limit as usize);
        Ok(rows)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub settings: Arc<dyn AppSettingsRepository>,
    pub attempts: Arc<dyn QuizAttemptRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let settings: Arc<dyn AppSettingsRepository> = Arc::new(repo.clone());
        let attempts: Arc<dyn QuizAttemptRepository> = Arc::new(repo);
        Self { settings, attempts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sanderson_core::model::AppSettingsDraft;
    use sanderson_core::model::quiz::{Difficulty, PassThreshold};
    use sanderson_core::time::fixed_now;

    fn attempt(minutes: i64, score: u32) -> QuizAttempt {
        let completed = fixed_now() + Duration::minutes(minutes);
        QuizAttempt::from_persisted(
            Difficulty::Medium,
            fixed_now(),
            completed,
            score,
            7,
            PassThreshold::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn settings_start_empty_and_persist() {
        let repo = InMemoryRepository::new();
        assert!(repo.get_settings().await.unwrap().is_none());

        let settings = AppSettingsDraft {
            api_model: Some("gpt-4o-mini".into()),
            ..AppSettingsDraft::default()
        }
        .validate()
        .unwrap();
        repo.save_settings(&settings).await.unwrap();
        assert_eq!(repo.get_settings().await.unwrap(), Some(settings));
    }

    #[tokio::test]
    async fn attempts_list_newest_first_with_limit() {
        let repo = InMemoryRepository::new();
        let first = repo.append_attempt(&attempt(1, 3)).await.unwrap();
        let second = repo.append_attempt(&attempt(5, 6)).await.unwrap();
        repo.append_attempt(&attempt(2, 4)).await.unwrap();

        let rows = repo.list_attempts(2).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, second);
        assert_eq!(rows[0].attempt.score(), 6);

        assert_eq!(repo.get_attempt(first).await.unwrap().score(), 3);
        assert!(matches!(
            repo.get_attempt(AttemptId::new(99)).await,
            Err(StorageError::NotFound)
        ));
    }
}
