use std::fmt;
use std::num::NonZeroU8;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every multiple-choice question carries exactly this many options.
pub const OPTION_COUNT: usize = 4;

/// Number of questions in a full quiz run.
pub const DEFAULT_QUIZ_LENGTH: u8 = 7;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Shape violations found when validating an externally supplied question.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizValidationError {
    #[error("question text cannot be empty")]
    EmptyQuestion,

    #[error("expected {OPTION_COUNT} options, got {got}")]
    OptionCount { got: usize },

    #[error("correct option index {0} is out of range")]
    OptionIndexOutOfRange(i64),
}

//
// ─── OPTION INDEX ─────────────────────────────────────────────────────────────
//

/// Zero-based position of an option within a question, always in `0..OPTION_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct OptionIndex(u8);

impl OptionIndex {
    /// # Errors
    ///
    /// Returns `QuizValidationError::OptionIndexOutOfRange` if `value` is not in `0..4`.
    pub fn new(value: u8) -> Result<Self, QuizValidationError> {
        if usize::from(value) < OPTION_COUNT {
            Ok(Self(value))
        } else {
            Err(QuizValidationError::OptionIndexOutOfRange(i64::from(value)))
        }
    }

    /// Iterates over all valid indices in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..OPTION_COUNT as u8).map(Self)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn as_usize(self) -> usize {
        usize::from(self.0)
    }
}

impl TryFrom<u8> for OptionIndex {
    type Error = QuizValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OptionIndex> for u8 {
    fn from(index: OptionIndex) -> Self {
        index.0
    }
}

impl fmt::Display for OptionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── DIFFICULTY ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Parses the canonical label (case-insensitive).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(raw.trim()))
    }

    /// What a question of this level should focus on.
    #[must_use]
    pub fn guidance(self) -> &'static str {
        match self {
            Difficulty::Easy => "focus on basic definitions and common applications",
            Difficulty::Medium => {
                "cover more specific concepts, algorithms, or techniques"
            }
            Difficulty::Hard => {
                "delve into nuanced details, advanced architectures, or comparative analysis"
            }
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters handed to a question source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizRequest {
    pub difficulty: Difficulty,
    pub number_of_questions: NonZeroU8,
}

impl QuizRequest {
    #[must_use]
    pub fn new(difficulty: Difficulty, number_of_questions: NonZeroU8) -> Self {
        Self {
            difficulty,
            number_of_questions,
        }
    }

    #[must_use]
    pub fn expected_len(&self) -> usize {
        usize::from(self.number_of_questions.get())
    }
}

impl Default for QuizRequest {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            number_of_questions: NonZeroU8::new(DEFAULT_QUIZ_LENGTH).unwrap_or(NonZeroU8::MIN),
        }
    }
}

//
// ─── VALIDATED QUESTION ───────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub text: String,
}

/// A multiple-choice question whose shape has been checked once at the boundary.
///
/// Downstream code may rely on: non-empty question text, exactly four options,
/// and a correct index that points into `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuizQuestionDraft", into = "QuizQuestionDraft")]
pub struct QuizQuestion {
    question_text: String,
    options: [QuizOption; OPTION_COUNT],
    correct_option: OptionIndex,
    explanation: Option<String>,
}

impl QuizQuestion {
    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    #[must_use]
    pub fn options(&self) -> &[QuizOption; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: OptionIndex) -> &QuizOption {
        &self.options[index.as_usize()]
    }

    #[must_use]
    pub fn correct_option(&self) -> OptionIndex {
        self.correct_option
    }

    #[must_use]
    pub fn correct_option_text(&self) -> &str {
        &self.option(self.correct_option).text
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn is_correct(&self, answer: OptionIndex) -> bool {
        answer == self.correct_option
    }
}

//
// ─── DRAFT (wire shape) ───────────────────────────────────────────────────────
//

/// Unvalidated question as produced by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionDraft {
    pub question_text: String,
    pub options: Vec<QuizOption>,
    pub correct_option_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuizQuestionDraft {
    /// Build a draft from plain option strings.
    #[must_use]
    pub fn new(
        question_text: impl Into<String>,
        options: [&str; OPTION_COUNT],
        correct_option_index: i64,
        explanation: Option<&str>,
    ) -> Self {
        Self {
            question_text: question_text.into(),
            options: options
                .into_iter()
                .map(|text| QuizOption {
                    text: text.to_string(),
                })
                .collect(),
            correct_option_index,
            explanation: explanation.map(str::to_string),
        }
    }

    /// Check question text, option arity and index range. Option text is taken as given.
    ///
    /// # Errors
    ///
    /// Returns the first `QuizValidationError` found.
    pub fn validate(self) -> Result<QuizQuestion, QuizValidationError> {
        let question_text = self.question_text.trim().to_string();
        if question_text.is_empty() {
            return Err(QuizValidationError::EmptyQuestion);
        }

        let got = self.options.len();
        let options: [QuizOption; OPTION_COUNT] = self
            .options
            .try_into()
            .map_err(|_| QuizValidationError::OptionCount { got })?;

        let correct_option = u8::try_from(self.correct_option_index)
            .ok()
            .and_then(|raw| OptionIndex::new(raw).ok())
            .ok_or(QuizValidationError::OptionIndexOutOfRange(
                self.correct_option_index,
            ))?;

        let explanation = self
            .explanation
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        Ok(QuizQuestion {
            question_text,
            options,
            correct_option,
            explanation,
        })
    }
}

impl From<QuizQuestion> for QuizQuestionDraft {
    fn from(question: QuizQuestion) -> Self {
        Self {
            question_text: question.question_text,
            options: question.options.into(),
            correct_option_index: i64::from(question.correct_option.value()),
            explanation: question.explanation,
        }
    }
}

impl TryFrom<QuizQuestionDraft> for QuizQuestion {
    type Error = QuizValidationError;

    fn try_from(draft: QuizQuestionDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

//
// ─── QUESTION SET ─────────────────────────────────────────────────────────────
//

/// Why a generated batch of questions cannot start a quiz.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSetError {
    #[error("expected {expected} questions, got {got}")]
    CountMismatch { expected: usize, got: usize },

    #[error("question {index} is malformed: {source}")]
    Malformed {
        index: usize,
        source: QuizValidationError,
    },
}

/// Validate a whole batch against the requested size.
///
/// # Errors
///
/// Returns `QuestionSetError::CountMismatch` when the length differs from `expected`,
/// or `QuestionSetError::Malformed` for the first question failing its shape check.
pub fn validate_question_set(
    drafts: Vec<QuizQuestionDraft>,
    expected: usize,
) -> Result<Vec<QuizQuestion>, QuestionSetError> {
    if drafts.len() != expected {
        return Err(QuestionSetError::CountMismatch {
            expected,
            got: drafts.len(),
        });
    }

    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| {
            draft
                .validate()
                .map_err(|source| QuestionSetError::Malformed { index, source })
        })
        .collect()
}
