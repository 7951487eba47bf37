use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::MessageId;
use crate::model::media::ImageDataUri;
use crate::model::quiz::topic_from_message;
use crate::model::resources::SuggestedResource;

/// Display name of the assistant persona.
pub const ASSISTANT_NAME: &str = "Christian";

/// Reply appended when a request to the assistant fails.
pub const ERROR_REPLY: &str =
    "Sorry, I encountered an error trying to process your request. Please try again.";

/// Question sent with an image when the user typed nothing.
pub const DEFAULT_IMAGE_QUESTION: &str = "Analyze this image.";

/// Most entities kept from a text analysis.
pub const MAX_ENTITIES: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChatMessageError {
    #[error("a message needs text or an image")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Speaker label used in transcripts.
    #[must_use]
    pub fn speaker(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => ASSISTANT_NAME,
        }
    }
}

//
// ─── TEXT ANALYSIS ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
    Mixed,
}

impl Sentiment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
            Sentiment::Mixed => "Mixed",
        }
    }

    /// Lenient parse; anything unrecognized is `Neutral`.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            "mixed" => Sentiment::Mixed,
            _ => Sentiment::Neutral,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Sentiment and prominent entities of a user query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NlpAnalysis {
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default)]
    pub prominent_entities: Vec<Entity>,
}

impl NlpAnalysis {
    #[must_use]
    pub fn new(sentiment: Sentiment, mut prominent_entities: Vec<Entity>) -> Self {
        prominent_entities.truncate(MAX_ENTITIES);
        Self {
            sentiment,
            prominent_entities,
        }
    }

    /// Result reported when analysis could not be performed.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            prominent_entities: vec![Entity {
                name: "Error during analysis".to_string(),
                kind: "UNKNOWN".to_string(),
            }],
        }
    }
}

//
// ─── MESSAGES ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub image: Option<ImageDataUri>,
    pub suggested_resources: Vec<SuggestedResource>,
    pub nlp_analysis: Option<NlpAnalysis>,
    /// Whether "Test your knowledge" is offered for this reply.
    pub can_have_quiz: bool,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    #[must_use]
    pub fn assistant(content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        let content = content.into();
        let can_have_quiz = !content.trim().is_empty();
        Self {
            id: MessageId::new_v4(),
            role: Role::Assistant,
            content,
            image: None,
            suggested_resources: Vec::new(),
            nlp_analysis: None,
            can_have_quiz,
            created_at,
        }
    }

    #[must_use]
    pub fn error_reply(created_at: DateTime<Utc>) -> Self {
        Self {
            can_have_quiz: false,
            ..Self::assistant(ERROR_REPLY, created_at)
        }
    }

    #[must_use]
    pub fn with_resources(mut self, resources: Vec<SuggestedResource>) -> Self {
        self.suggested_resources = resources;
        self
    }

    #[must_use]
    pub fn with_analysis(mut self, analysis: Option<NlpAnalysis>) -> Self {
        self.nlp_analysis = analysis;
        self
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Topic used when the learner asks for a quiz on this reply.
    #[must_use]
    pub fn quiz_topic(&self) -> Option<&str> {
        (self.can_have_quiz && !self.content.is_empty()).then(|| topic_from_message(&self.content))
    }
}

/// What the user is about to send.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserMessageDraft {
    pub text: String,
    pub image: Option<ImageDataUri>,
}

impl UserMessageDraft {
    /// # Errors
    ///
    /// Returns `ChatMessageError::Empty` when the text is blank and no image is attached.
    pub fn validate(self, created_at: DateTime<Utc>) -> Result<ChatMessage, ChatMessageError> {
        if self.text.trim().is_empty() && self.image.is_none() {
            return Err(ChatMessageError::Empty);
        }
        Ok(ChatMessage {
            id: MessageId::new_v4(),
            role: Role::User,
            content: self.text,
            image: self.image,
            suggested_resources: Vec::new(),
            nlp_analysis: None,
            can_have_quiz: false,
            created_at,
        })
    }
}

/// Ordered chat history for one window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
