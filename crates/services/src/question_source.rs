use std::sync::Arc;

use async_trait::async_trait;
use sanderson_core::model::quiz::{QuizQuestionDraft, QuizRequest};
use serde::Deserialize;

use crate::ai::{AiClient, PromptMessage, prompts};
use crate::error::AiError;

/// Supplies unvalidated questions for a quiz request.
///
/// Implementations make no promise about count or shape; the caller validates.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `AiError` when the upstream call or decoding fails.
    async fn fetch_questions(
        &self,
        request: &QuizRequest,
    ) -> Result<Vec<QuizQuestionDraft>, AiError>;
}

/// Question source backed by a chat-completions model.
#[derive(Clone)]
pub struct LlmQuestionSource {
    client: Arc<AiClient>,
}

impl LlmQuestionSource {
    #[must_use]
    pub fn new(client: Arc<AiClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct QuestionsPayload {
    #[serde(default)]
    questions: Vec<QuizQuestionDraft>,
}

#[async_trait]
impl QuestionSource for LlmQuestionSource {
    async fn fetch_questions(
        &self,
        request: &QuizRequest,
    ) -> Result<Vec<QuizQuestionDraft>, AiError> {
        let payload: QuestionsPayload = self
            .client
            .complete_json(vec![
                PromptMessage::system(prompts::quiz_instructions(request)),
                PromptMessage::user(format!(
                    "Generate {} {} questions.",
                    request.expected_len(),
                    request.difficulty
                )),
            ])
            .await?;
        Ok(payload.questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_tolerates_missing_questions_key() {
        let payload: QuestionsPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.questions.is_empty());
    }

    #[test]
    fn payload_keeps_malformed_questions_for_validation() {
        let json = r#"{"questions": [
            {"questionText": "Q", "options": [{"text": "a"}], "correctOptionIndex": 7}
        ]}"#;
        let payload: QuestionsPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.questions.len(), 1);
        assert!(payload.questions[0].clone().validate().is_err());
    }
}
