use std::sync::Arc;

use async_trait::async_trait;
use sanderson_core::model::{Entity, ImageDataUri, NlpAnalysis, Sentiment};
use serde::Deserialize;
use tracing::warn;

use crate::ai::{AiClient, PromptMessage, prompts};
use crate::error::AiError;

/// Reply to a text query.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub response: String,
    pub nlp_analysis: Option<NlpAnalysis>,
}

/// Model-facing operations behind the chat window.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// # Errors
    ///
    /// Returns `AiError` when the upstream call or decoding fails.
    async fn respond(&self, query: &str) -> Result<AssistantReply, AiError>;

    /// # Errors
    ///
    /// Returns `AiError` when the upstream call or decoding fails.
    async fn analyze_image(&self, image: &ImageDataUri, question: &str) -> Result<String, AiError>;

    /// # Errors
    ///
    /// Returns `AiError` when the upstream call or decoding fails.
    async fn analyze_text(&self, text: &str) -> Result<NlpAnalysis, AiError>;

    /// # Errors
    ///
    /// Returns `AiError` when the upstream call or decoding fails.
    async fn summarize(&self, article_url: &str) -> Result<String, AiError>;

    /// # Errors
    ///
    /// Returns `AiError::EmptyResponse` when no image comes back.
    async fn generate_image(&self, prompt: &str) -> Result<ImageDataUri, AiError>;
}

/// `AssistantBackend` over the chat-completions client.
#[derive(Clone)]
pub struct LlmAssistant {
    client: Arc<AiClient>,
}

impl LlmAssistant {
    #[must_use]
    pub fn new(client: Arc<AiClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RespondPayload {
    response: String,
    #[serde(default)]
    nlp_analysis: Option<AnalysisPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisPayload {
    #[serde(default)]
    sentiment: String,
    #[serde(default)]
    prominent_entities: Vec<Entity>,
}

impl From<AnalysisPayload> for NlpAnalysis {
    fn from(payload: AnalysisPayload) -> Self {
        NlpAnalysis::new(
            Sentiment::parse_lenient(&payload.sentiment),
            payload.prominent_entities,
        )
    }
}

#[derive(Debug, Deserialize)]
struct AnswerPayload {
    answer: String,
}

#[derive(Debug, Deserialize)]
struct SummaryPayload {
    summary: String,
}

fn non_blank(text: String) -> Result<String, AiError> {
    if text.trim().is_empty() {
        Err(AiError::EmptyResponse)
    } else {
        Ok(text)
    }
}

#[async_trait]
impl AssistantBackend for LlmAssistant {
    async fn respond(&self, query: &str) -> Result<AssistantReply, AiError> {
        let payload: RespondPayload = self
            .client
            .complete_json(vec![
                PromptMessage::system(prompts::respond_instructions()),
                PromptMessage::user(query),
            ])
            .await?;
        Ok(AssistantReply {
            response: non_blank(payload.response)?,
            nlp_analysis: payload.nlp_analysis.map(NlpAnalysis::from),
        })
    }

    async fn analyze_image(&self, image: &ImageDataUri, question: &str) -> Result<String, AiError> {
        let payload: AnswerPayload = self
            .client
            .complete_json(vec![
                PromptMessage::system(prompts::IMAGE_INSTRUCTIONS),
                PromptMessage::user_with_image(question, image),
            ])
            .await?;
        non_blank(payload.answer)
    }

    async fn analyze_text(&self, text: &str) -> Result<NlpAnalysis, AiError> {
        let payload: AnalysisPayload = self
            .client
            .complete_json(vec![
                PromptMessage::system(prompts::ANALYSIS_INSTRUCTIONS),
                PromptMessage::user(text),
            ])
            .await?;
        Ok(payload.into())
    }

    async fn summarize(&self, article_url: &str) -> Result<String, AiError> {
        let payload: SummaryPayload = self
            .client
            .complete_json(vec![PromptMessage::user(prompts::summary_instructions(
                article_url,
            ))])
            .await?;
        non_blank(payload.summary)
    }

    async fn generate_image(&self, prompt: &str) -> Result<ImageDataUri, AiError> {
        self.client.generate_image(prompt).await
    }
}

/// Analyze `text`, substituting the fallback analysis on any failure.
pub async fn analyze_or_fallback(backend: &dyn AssistantBackend, text: &str) -> NlpAnalysis {
    match backend.analyze_text(text).await {
        Ok(analysis) => analysis,
        Err(err) => {
            warn!(error = %err, "text analysis failed");
            NlpAnalysis::fallback()
        }
    }
}
