use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::question::{OptionIndex, QuizQuestion};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ThresholdError {
    #[error("pass threshold must be between 0 and 100, got {0}")]
    OutOfRange(u8),
}

/// Minimum percentage needed to pass, in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PassThreshold(u8);

impl PassThreshold {
    pub const DEFAULT: PassThreshold = PassThreshold(70);

    /// # Errors
    ///
    /// Returns `ThresholdError::OutOfRange` above 100.
    pub fn new(percent: u8) -> Result<Self, ThresholdError> {
        if percent > 100 {
            return Err(ThresholdError::OutOfRange(percent));
        }
        Ok(Self(percent))
    }

    #[must_use]
    pub fn percent(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn is_met_by(self, percentage: f64) -> bool {
        percentage >= f64::from(self.0)
    }
}

impl Default for PassThreshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for PassThreshold {
    type Error = ThresholdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PassThreshold> for u8 {
    fn from(threshold: PassThreshold) -> Self {
        threshold.0
    }
}

impl fmt::Display for PassThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Outcome of grading a set of answers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizScore {
    correct: usize,
    total: usize,
    threshold: PassThreshold,
}

impl QuizScore {
    /// Count answers matching each question's correct option.
    ///
    /// Unset answers count as wrong. Extra answers beyond `questions` are ignored.
    #[must_use]
    pub fn compute(
        questions: &[QuizQuestion],
        answers: &[Option<OptionIndex>],
        threshold: PassThreshold,
    ) -> Self {
        let correct = questions
            .iter()
            .zip(answers)
            .filter(|(question, answer)| answer.is_some_and(|a| question.is_correct(a)))
            .count();
        Self {
            correct,
            total: questions.len(),
            threshold,
        }
    }

    /// Rebuild a score from stored counts.
    #[must_use]
    pub fn from_counts(correct: usize, total: usize, threshold: PassThreshold) -> Self {
        Self {
            correct: correct.min(total),
            total,
            threshold,
        }
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn threshold(&self) -> PassThreshold {
        self.threshold
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        100.0 * self.correct as f64 / self.total as f64
    }

    /// Percentage rounded half away from zero; use this for every display.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rounded_percentage(&self) -> u8 {
        self.percentage().round().clamp(0.0, 100.0) as u8
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.threshold.is_met_by(self.percentage())
    }
}
