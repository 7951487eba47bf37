use sanderson_core::model::quiz::{Difficulty, PassThreshold};
use sanderson_core::model::{AttemptId, QuizAttempt};
use sqlx::Row;

use crate::repository::{QuizAttemptRow, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn u8_from_i64(field: &'static str, v: i64) -> Result<u8, StorageError> {
    u8::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

/// Stored as the lowercase label.
pub(crate) fn difficulty_to_str(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "easy",
        Difficulty::Medium => "medium",
        Difficulty::Hard => "hard",
    }
}

pub(crate) fn parse_difficulty(s: &str) -> Result<Difficulty, StorageError> {
    match s {
        "easy" => Ok(Difficulty::Easy),
        "medium" => Ok(Difficulty::Medium),
        "hard" => Ok(Difficulty::Hard),
        _ => Err(StorageError::Serialization(format!(
            "invalid difficulty: {s}"
        ))),
    }
}

pub(crate) fn map_attempt_row(row: &sqlx::sqlite::SqliteRow) -> Result<QuizAttempt, StorageError> {
    let difficulty_str: String = row.try_get("difficulty").map_err(ser)?;
    let difficulty = parse_difficulty(difficulty_str.as_str())?;
    let started_at = row.try_get("started_at").map_err(ser)?;
    let completed_at = row.try_get("completed_at").map_err(ser)?;
    let score = u32_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?;
    let total_questions = u32_from_i64(
        "total_questions",
        row.try_get::<i64, _>("total_questions").map_err(ser)?,
    )?;
    let threshold = PassThreshold::new(u8_from_i64(
        "pass_threshold",
        row.try_get::<i64, _>("pass_threshold").map_err(ser)?,
    )?)
    .map_err(ser)?;

    QuizAttempt::from_persisted(
        difficulty,
        started_at,
        completed_at,
        score,
        total_questions,
        threshold,
    )
    .map_err(ser)
}

pub(crate) fn map_attempt_row_with_id(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<QuizAttemptRow, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    let attempt = map_attempt_row(row)?;
    Ok(QuizAttemptRow::new(AttemptId::new(id), attempt))
}
