use std::sync::Arc;

use sanderson_core::model::{
    ChatMessage, Conversation, DEFAULT_IMAGE_QUESTION, NlpAnalysis, UserMessageDraft,
    resources_for_topic,
};
use tracing::{info, instrument, warn};
use url::Url;

use crate::Clock;
use crate::assistant::{AssistantBackend, analyze_or_fallback};
use crate::error::ChatError;

/// Turns user messages into assistant replies.
#[derive(Clone)]
pub struct ChatService {
    clock: Clock,
    backend: Arc<dyn AssistantBackend>,
}

impl ChatService {
    #[must_use]
    pub fn new(clock: Clock, backend: Arc<dyn AssistantBackend>) -> Self {
        Self { clock, backend }
    }

    /// Validate a draft into a user message stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Message` when the draft has no text and no image.
    pub fn user_message(&self, draft: UserMessageDraft) -> Result<ChatMessage, ChatError> {
        Ok(draft.validate(self.clock.now())?)
    }

    /// The apology shown in place of a failed reply.
    #[must_use]
    pub fn apology(&self) -> ChatMessage {
        ChatMessage::error_reply(self.clock.now())
    }

    /// Produce the assistant reply to `message`.
    ///
    /// Image messages are analyzed with their text as the question; text messages get
    /// an answer, optional analysis, and suggested resources for the query.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Ai` when the backend fails.
    #[instrument(skip_all, fields(has_image = message.image.is_some()))]
    pub async fn reply(&self, message: &ChatMessage) -> Result<ChatMessage, ChatError> {
        if let Some(image) = &message.image {
            let question = if message.content.trim().is_empty() {
                DEFAULT_IMAGE_QUESTION
            } else {
                message.content.as_str()
            };
            let answer = self.backend.analyze_image(image, question).await?;
            info!("image analyzed");
            return Ok(ChatMessage::assistant(answer, self.clock.now()));
        }

        let query = message.content.trim();
        let reply = self.backend.respond(query).await?;
        info!(analysis = reply.nlp_analysis.is_some(), "reply received");
        Ok(ChatMessage::assistant(reply.response, self.clock.now())
            .with_analysis(reply.nlp_analysis)
            .with_resources(resources_for_topic(query)))
    }

    /// Append the user message and the reply to `conversation`.
    ///
    /// On backend failure the apology reply is appended and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Message` (nothing appended) for an empty draft, or
    /// `ChatError::Ai` when the reply fails.
    pub async fn send(
        &self,
        conversation: &mut Conversation,
        draft: UserMessageDraft,
    ) -> Result<ChatMessage, ChatError> {
        let user = self.user_message(draft)?;
        let user = conversation.push(user).clone();
        match self.reply(&user).await {
            Ok(reply) => Ok(conversation.push(reply).clone()),
            Err(err) => {
                warn!(error = %err, "chat reply failed");
                conversation.push(self.apology());
                Err(err)
            }
        }
    }

    /// Sentiment and entities for `text`; never fails.
    pub async fn analyze(&self, text: &str) -> NlpAnalysis {
        analyze_or_fallback(self.backend.as_ref(), text).await
    }

    /// Assistant message carrying the analysis of `text`.
    pub async fn analysis_reply(&self, text: &str) -> ChatMessage {
        let analysis = self.analyze(text).await;
        let mut message = ChatMessage::assistant("Text analysis", self.clock.now())
            .with_analysis(Some(analysis));
        message.can_have_quiz = false;
        message
    }

    /// Summarize the article at `article_url`.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::InvalidUrl` for a malformed URL, or `ChatError::Ai`.
    pub async fn summarize_article(&self, article_url: &str) -> Result<ChatMessage, ChatError> {
        let url = Url::parse(article_url.trim())?;
        let summary = self.backend.summarize(url.as_str()).await?;
        Ok(ChatMessage::assistant(summary, self.clock.now()))
    }

    /// Generate an image for `prompt` as an assistant message.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::EmptyPrompt` for a blank prompt, or `ChatError::Ai`.
    pub async fn generate_image(&self, prompt: &str) -> Result<ChatMessage, ChatError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ChatError::EmptyPrompt);
        }
        let image = self.backend.generate_image(prompt).await?;
        let mut message = ChatMessage::assistant(format!("Image: {prompt}"), self.clock.now());
        message.image = Some(image);
        message.can_have_quiz = false;
        Ok(message)
    }
}
