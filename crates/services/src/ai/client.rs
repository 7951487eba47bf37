use reqwest::Client;
use sanderson_core::model::ImageDataUri;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::config::AiConfig;
use crate::error::AiError;

/// Thin client for the chat-completions and image-generation endpoints.
#[derive(Clone)]
pub struct AiClient {
    client: Client,
    config: Option<AiConfig>,
}

impl AiClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(AiConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<AiConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    fn config(&self) -> Result<&AiConfig, AiError> {
        self.config.as_ref().ok_or(AiError::Disabled)
    }

    /// Send a chat request in JSON mode and decode the reply into `T`.
    ///
    /// # Errors
    ///
    /// Returns `AiError` when the client is disabled, the request fails, the reply is
    /// empty, or it does not decode into `T`.
    #[instrument(skip_all, fields(messages = messages.len()))]
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        messages: Vec<PromptMessage>,
    ) -> Result<T, AiError> {
        let config = self.config()?;
        let payload = ChatRequest {
            model: config.model.clone(),
            messages,
            temperature: 0.4,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(config.endpoint("chat/completions"))
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AiError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AiError::EmptyResponse)?;

        debug!(bytes = content.len(), "chat completion received");
        decode_json(&content)
    }

    /// Generate an image and return it inline.
    ///
    /// # Errors
    ///
    /// Returns `AiError::EmptyResponse` when no image data comes back, or other
    /// `AiError`s for transport failures.
    #[instrument(skip_all)]
    pub async fn generate_image(&self, prompt: &str) -> Result<ImageDataUri, AiError> {
        let config = self.config()?;
        let legacy = config.image_model.starts_with("dall-e");
        let payload = ImageRequest {
            model: config.image_model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: "1024x1024",
            response_format: legacy.then_some("b64_json"),
        };

        let response = self
            .client
            .post(config.endpoint("images/generations"))
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AiError::HttpStatus(response.status()));
        }

        let body: ImageResponse = response.json().await?;
        image_from_response(body)
    }
}

/// Decode a model reply, tolerating a surrounding Markdown code fence.
pub(crate) fn decode_json<T: DeserializeOwned>(content: &str) -> Result<T, AiError> {
    let trimmed = content.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);
    Ok(serde_json::from_str(unfenced.trim())?)
}

fn image_from_response(body: ImageResponse) -> Result<ImageDataUri, AiError> {
    let b64 = body
        .data
        .into_iter()
        .next()
        .and_then(|item| item.b64_json)
        .filter(|data| !data.is_empty())
        .ok_or(AiError::EmptyResponse)?;
    Ok(ImageDataUri::parse(&format!("data:image/png;base64,{b64}"))?)
}

//
// ─── WIRE TYPES ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Serialize)]
pub struct PromptMessage {
    role: &'static str,
    content: PromptContent,
}

impl PromptMessage {
    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: PromptContent::Text(text.into()),
        }
    }

    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: PromptContent::Text(text.into()),
        }
    }

    /// User turn carrying text and an inline image.
    #[must_use]
    pub fn user_with_image(text: impl Into<String>, image: &ImageDataUri) -> Self {
        Self {
            role: "user",
            content: PromptContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image.as_uri(),
                    },
                },
            ]),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum PromptContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<PromptMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImageRequest {
    model: String,
    prompt: String,
    n: u8,
    size: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    b64_json: Option<String>,
}
