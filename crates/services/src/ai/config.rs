use std::env;

use sanderson_core::model::AppSettings;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_IMAGE_MODEL: &str = "gpt-image-1";

pub const ENV_API_KEY: &str = "SANDERSON_AI_API_KEY";
pub const ENV_BASE_URL: &str = "SANDERSON_AI_BASE_URL";
pub const ENV_MODEL: &str = "SANDERSON_AI_MODEL";
pub const ENV_IMAGE_MODEL: &str = "SANDERSON_AI_IMAGE_MODEL";

/// Connection details for an OpenAI-compatible endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub image_model: String,
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("image_model", &self.image_model)
            .finish()
    }
}

impl AiConfig {
    /// Read configuration from the process environment only.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::resolve(&AppSettings::default(), |key| env::var(key).ok())
    }

    /// Saved settings first, then the environment, then built-in defaults.
    ///
    /// Returns `None` when no API key is available from either source.
    #[must_use]
    pub fn resolve(settings: &AppSettings, lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let from_env = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());

        let api_key = settings
            .api_key()
            .map(str::to_string)
            .or_else(|| from_env(ENV_API_KEY))?;
        let base_url = settings
            .api_base_url()
            .map(str::to_string)
            .or_else(|| from_env(ENV_BASE_URL))
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let model = settings
            .api_model()
            .map(str::to_string)
            .or_else(|| from_env(ENV_MODEL))
            .unwrap_or_else(|| DEFAULT_MODEL.into());
        let image_model = settings
            .image_model()
            .map(str::to_string)
            .or_else(|| from_env(ENV_IMAGE_MODEL))
            .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.into());

        Some(Self {
            base_url,
            api_key,
            model,
            image_model,
        })
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}
