use std::fmt;

use super::session::QuizSession;

/// What the learner picked for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChosenAnswer {
    Answered(String),
    NotAnswered,
}

impl ChosenAnswer {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            ChosenAnswer::Answered(text) => text,
            ChosenAnswer::NotAnswered => "Not answered",
        }
    }
}

impl fmt::Display for ChosenAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// One row of the post-quiz review, in original question order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizReviewItem {
    /// 1-based position.
    pub number: usize,
    pub question_text: String,
    pub chosen: ChosenAnswer,
    pub correct_option_text: String,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

/// Project a session into review rows.
#[must_use]
pub fn review_session(session: &QuizSession) -> Vec<QuizReviewItem> {
    session
        .questions()
        .iter()
        .zip(session.answers())
        .enumerate()
        .map(|(i, (question, answer))| {
            let chosen = match answer {
                Some(idx) => ChosenAnswer::Answered(question.option(*idx).text.clone()),
                None => ChosenAnswer::NotAnswered,
            };
            QuizReviewItem {
                number: i + 1,
                question_text: question.question_text().to_string(),
                chosen,
                correct_option_text: question.correct_option_text().to_string(),
                is_correct: answer.is_some_and(|a| question.is_correct(a)),
                explanation: question.explanation().map(str::to_string),
            }
        })
        .collect()
}
