mod catalog;
mod question;
mod review;
mod scoring;
mod session;

pub use catalog::{TOPIC_PREFIX_CHARS, question_for_topic, topic_from_message};
pub use question::{
    DEFAULT_QUIZ_LENGTH, Difficulty, OPTION_COUNT, OptionIndex, QuestionSetError, QuizOption,
    QuizQuestion, QuizQuestionDraft, QuizRequest, QuizValidationError, validate_question_set,
};
pub use review::{ChosenAnswer, QuizReviewItem, review_session};
pub use scoring::{PassThreshold, QuizScore, ThresholdError};
pub use session::{QuizCompletion, QuizPhase, QuizSession, QuizSessionError, QuizSnapshot};
