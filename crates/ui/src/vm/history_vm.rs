use services::QuizAttemptListItem;

use super::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizAttemptCardVm {
    pub id: i64,
    pub completed_at_str: String,
    pub difficulty: &'static str,
    pub score_label: String,
    pub outcome_label: &'static str,
    pub passed: bool,
}

#[must_use]
pub fn map_quiz_attempt_cards(items: &[QuizAttemptListItem]) -> Vec<QuizAttemptCardVm> {
    items
        .iter()
        .map(|item| QuizAttemptCardVm {
            id: item.id.value(),
            completed_at_str: format_datetime(item.completed_at),
            difficulty: item.difficulty.as_str(),
            score_label: format!(
                "{} / {} ({}%)",
                item.score, item.total_questions, item.percent
            ),
            outcome_label: if item.passed { "Passed" } else { "Not passed" },
            passed: item.passed,
        })
        .collect()
}
