use sanderson_core::model::quiz::{
    Difficulty, OptionIndex, QuizPhase, QuizReviewItem, QuizScore, QuizSession,
    review_session,
};
use sanderson_core::model::AttemptId;
use services::QuizService;

use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Select(OptionIndex),
    Next,
    Previous,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizOptionVm {
    pub index: OptionIndex,
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizQuestionVm {
    pub position_label: String,
    pub text: String,
    pub options: Vec<QuizOptionVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizReviewRowVm {
    pub heading: String,
    pub your_answer: String,
    /// Shown only for wrong or missing answers.
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
    pub is_correct: bool,
}

impl From<QuizReviewItem> for QuizReviewRowVm {
    fn from(item: QuizReviewItem) -> Self {
        Self {
            heading: format!("{}. {}", item.number, item.question_text),
            your_answer: item.chosen.text().to_string(),
            correct_answer: (!item.is_correct).then_some(item.correct_option_text),
            explanation: item.explanation,
            is_correct: item.is_correct,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizResultsVm {
    pub title: String,
    pub headline: &'static str,
    pub encouragement: Option<&'static str>,
    pub score_line: String,
    pub percent: u8,
    pub passed: bool,
    pub review: Vec<QuizReviewRowVm>,
}

#[must_use]
pub fn map_quiz_results(session: &QuizSession, score: &QuizScore) -> QuizResultsVm {
    let passed = score.passed();
    let percent = score.rounded_percentage();
    QuizResultsVm {
        title: format!("Quiz Results ({})", session.difficulty()),
        headline: if passed {
            "Congratulations! You Passed!"
        } else {
            "Wow, you did good!"
        },
        encouragement: (!passed).then_some("A little more training is needed."),
        score_line: format!(
            "You scored {} out of {}! ({percent}%)",
            score.correct(),
            score.total()
        ),
        percent,
        passed,
        review: review_session(session)
            .into_iter()
            .map(QuizReviewRowVm::from)
            .collect(),
    }
}

/// Screen state for one running quiz.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizVm {
    session: QuizSession,
    results: Option<QuizResultsVm>,
}

impl QuizVm {
    #[must_use]
    pub fn new(session: QuizSession) -> Self {
        Self {
            session,
            results: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.session.difficulty()
    }

    #[must_use]
    pub fn title(&self) -> String {
        format!("AI Quiz ({})", self.session.difficulty())
    }

    #[must_use]
    pub fn question(&self) -> QuizQuestionVm {
        let snapshot = self.session.snapshot();
        let question = snapshot.current_question;
        let options = question
            .options()
            .iter()
            .enumerate()
            .filter_map(|(i, option)| {
                let index = OptionIndex::new(u8::try_from(i).ok()?).ok()?;
                Some(QuizOptionVm {
                    index,
                    text: option.text.clone(),
                    selected: snapshot.current_answer == Some(index),
                })
            })
            .collect();
        QuizQuestionVm {
            position_label: format!(
                "Question {} of {}",
                snapshot.current_index + 1,
                snapshot.total_questions
            ),
            text: question.question_text().to_string(),
            options,
        }
    }

    /// Position through the quiz as a percentage of questions reached.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let total = self.session.total_questions().max(1);
        let reached = self.session.current_index() + 1;
        u8::try_from(reached * 100 / total).unwrap_or(100)
    }

    #[must_use]
    pub fn can_go_previous(&self) -> bool {
        self.session.can_go_previous()
    }

    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.session.can_go_next()
    }

    /// The last question shows Submit instead of Next.
    #[must_use]
    pub fn shows_submit(&self) -> bool {
        self.session.is_last_question()
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.session.can_submit()
    }

    #[must_use]
    pub fn results(&self) -> Option<&QuizResultsVm> {
        self.results.as_ref()
    }

    pub fn apply(&mut self, intent: QuizIntent) {
        match intent {
            QuizIntent::Select(index) => {
                // Rejected only once submitted; answers are frozen then.
                if self.session.select_option(index).is_err() {
                    debug_assert!(self.session.is_completed());
                }
            }
            QuizIntent::Next => {
                self.session.go_next();
            }
            QuizIntent::Previous => {
                self.session.go_previous();
            }
        }
    }

    /// Submit in place and show results. Returns the completed session to record.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` when the session cannot be submitted, including
    /// when it was already submitted.
    pub fn complete(&mut self, quiz: &QuizService) -> Result<QuizSession, ViewError> {
        quiz.complete(&mut self.session)
            .map_err(|_| ViewError::Unknown)?;
        self.results = Some(map_quiz_results(&self.session, &self.session.score()));
        Ok(self.session.clone())
    }

    /// Complete and record in one step.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` when the session cannot be submitted.
    pub async fn submit(&mut self, quiz: &QuizService) -> Result<Option<AttemptId>, ViewError> {
        let completed = self.complete(quiz)?;
        Ok(quiz.record(&completed).await)
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` while the quiz is still running.
    pub fn restart(&mut self, quiz: &QuizService) -> Result<(), ViewError> {
        self.session = quiz
            .restart(&self.session)
            .map_err(|_| ViewError::Unknown)?;
        self.results = None;
        Ok(())
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.session.phase() == QuizPhase::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanderson_core::model::quiz::{PassThreshold, QuizQuestionDraft, validate_question_set};
    use sanderson_core::time::fixed_now;
    use std::sync::Arc;
    use storage::repository::InMemoryRepository;

    struct NoSource;

    #[async_trait::async_trait]
    impl services::QuestionSource for NoSource {
        async fn fetch_questions(
            &self,
            _request: &sanderson_core::model::quiz::QuizRequest,
        ) -> Result<Vec<QuizQuestionDraft>, services::AiError> {
            Err(services::AiError::Disabled)
        }
    }

    fn session() -> QuizSession {
        let drafts = [1, 0, 2]
            .into_iter()
            .map(|correct| {
                QuizQuestionDraft::new("Q", ["a", "b", "c", "d"], correct, Some("why"))
            })
            .collect();
        let questions = validate_question_set(drafts, 3).unwrap();
        QuizSession::new(questions, Difficulty::Medium, PassThreshold::default(), fixed_now())
            .unwrap()
    }

    fn quiz_service() -> QuizService {
        QuizService::new(
            services::Clock::fixed(fixed_now()),
            Arc::new(NoSource),
            Arc::new(InMemoryRepository::new()),
        )
    }

    fn pick(vm: &mut QuizVm, i: u8) {
        vm.apply(QuizIntent::Select(OptionIndex::new(i).unwrap()));
    }

    #[test]
    fn question_vm_marks_selection_and_position() {
        let mut vm = QuizVm::new(session());
        pick(&mut vm, 2);
        let question = vm.question();
        assert_eq!(question.position_label, "Question 1 of 3");
        assert_eq!(question.options.len(), 4);
        assert!(question.options[2].selected);
        assert_eq!(vm.progress_percent(), 33);
        assert!(!vm.can_go_previous());
        assert!(!vm.shows_submit());
    }

    #[tokio::test]
    async fn failing_result_shows_encouragement_and_review() {
        let svc = quiz_service();
        let mut vm = QuizVm::new(session());
        for (i, answer) in [1, 0, 1].into_iter().enumerate() {
            pick(&mut vm, answer);
            if i < 2 {
                vm.apply(QuizIntent::Next);
            }
        }
        assert!(vm.shows_submit());
        vm.submit(&svc).await.unwrap();

        let results = vm.results().unwrap();
        assert_eq!(results.title, "Quiz Results (Medium)");
        assert_eq!(results.headline, "Wow, you did good!");
        assert_eq!(results.encouragement, Some("A little more training is needed."));
        assert_eq!(results.score_line, "You scored 2 out of 3! (67%)");
        assert_eq!(results.review[2].your_answer, "b");
        assert_eq!(results.review[2].correct_answer.as_deref(), Some("c"));
        assert_eq!(results.review[0].correct_answer, None);

        vm.restart(&svc).unwrap();
        assert!(vm.results().is_none());
        assert_eq!(vm.session().answered_count(), 0);
    }

    #[tokio::test]
    async fn submit_with_gap_is_rejected() {
        let svc = quiz_service();
        let mut vm = QuizVm::new(session());
        vm.apply(QuizIntent::Next);
        vm.apply(QuizIntent::Next);
        assert!(!vm.can_submit());
        assert_eq!(vm.submit(&svc).await, Err(ViewError::Unknown));
        assert!(!vm.is_completed());
    }

    #[tokio::test]
    async fn second_submit_is_rejected_and_records_once() {
        let repo = InMemoryRepository::new();
        let svc = QuizService::new(
            services::Clock::fixed(fixed_now()),
            Arc::new(NoSource),
            Arc::new(repo.clone()),
        );
        let mut vm = QuizVm::new(session());
        for (i, answer) in [1, 0, 2].into_iter().enumerate() {
            pick(&mut vm, answer);
            if i < 2 {
                vm.apply(QuizIntent::Next);
            }
        }

        let completed = vm.complete(&svc).unwrap();
        assert!(vm.is_completed());
        assert!(!vm.can_submit());
        assert_eq!(vm.complete(&svc), Err(ViewError::Unknown));
        assert_eq!(vm.submit(&svc).await, Err(ViewError::Unknown));

        pick(&mut vm, 3);
        assert_eq!(vm.session().answers()[2], OptionIndex::new(2).ok());

        assert!(svc.record(&completed).await.is_some());
        let rows = storage::repository::QuizAttemptRepository::list_attempts(&repo, 10)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn passing_result_has_no_encouragement() {
        let mut session = session();
        for (i, answer) in [1, 0, 2].into_iter().enumerate() {
            session.select_option(OptionIndex::new(answer).unwrap()).unwrap();
            if i < 2 {
                session.go_next();
            }
        }
        session.submit(fixed_now()).unwrap();
        let results = map_quiz_results(&session, &session.score());
        assert_eq!(results.headline, "Congratulations! You Passed!");
        assert!(results.encouragement.is_none());
        assert_eq!(results.percent, 100);
    }
}
