use std::num::NonZeroU8;

use thiserror::Error;
use url::Url;

use crate::model::quiz::{DEFAULT_QUIZ_LENGTH, PassThreshold};

/// Longest quiz a user can configure.
pub const MAX_QUIZ_LENGTH: u8 = 20;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppSettings {
    api_key: Option<String>,
    api_model: Option<String>,
    api_base_url: Option<String>,
    image_model: Option<String>,
    pass_threshold: PassThreshold,
    quiz_length: NonZeroU8,
}

#[derive(Clone, Debug, Default)]
pub struct AppSettingsDraft {
    pub api_key: Option<String>,
    pub api_model: Option<String>,
    pub api_base_url: Option<String>,
    pub image_model: Option<String>,
    pub pass_threshold: Option<u8>,
    pub quiz_length: Option<u8>,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppSettingsError {
    #[error("invalid base URL")]
    InvalidBaseUrl,

    #[error("pass threshold must be between 0 and 100, got {0}")]
    InvalidThreshold(u8),

    #[error("quiz length must be between 1 and {MAX_QUIZ_LENGTH}, got {0}")]
    InvalidQuizLength(u8),
}

impl AppSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft into persisted settings.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsError` if the base URL is present but invalid, or a
    /// numeric field is out of range.
    pub fn validate(self) -> Result<AppSettings, AppSettingsError> {
        let api_key = normalize_optional(self.api_key);
        let api_model = normalize_optional(self.api_model);
        let api_base_url = normalize_optional(self.api_base_url);
        let image_model = normalize_optional(self.image_model);

        if let Some(url) = api_base_url.as_ref() {
            if Url::parse(url).is_err() {
                return Err(AppSettingsError::InvalidBaseUrl);
            }
        }

        let pass_threshold = match self.pass_threshold {
            Some(raw) => {
                PassThreshold::new(raw).map_err(|_| AppSettingsError::InvalidThreshold(raw))?
            }
            None => PassThreshold::default(),
        };

        let quiz_length = match self.quiz_length {
            Some(raw) if raw <= MAX_QUIZ_LENGTH => {
                NonZeroU8::new(raw).ok_or(AppSettingsError::InvalidQuizLength(raw))?
            }
            Some(raw) => return Err(AppSettingsError::InvalidQuizLength(raw)),
            None => default_quiz_length(),
        };

        Ok(AppSettings {
            api_key,
            api_model,
            api_base_url,
            image_model,
            pass_threshold,
            quiz_length,
        })
    }
}

impl AppSettings {
    /// Rehydrate settings from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsError` if the stored values no longer validate.
    pub fn from_persisted(draft: AppSettingsDraft) -> Result<Self, AppSettingsError> {
        draft.validate()
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    #[must_use]
    pub fn api_model(&self) -> Option<&str> {
        self.api_model.as_deref()
    }

    #[must_use]
    pub fn api_base_url(&self) -> Option<&str> {
        self.api_base_url.as_deref()
    }

    #[must_use]
    pub fn image_model(&self) -> Option<&str> {
        self.image_model.as_deref()
    }

    #[must_use]
    pub fn pass_threshold(&self) -> PassThreshold {
        self.pass_threshold
    }

    #[must_use]
    pub fn quiz_length(&self) -> NonZeroU8 {
        self.quiz_length
    }

    /// Editable copy of these settings.
    #[must_use]
    pub fn to_draft(&self) -> AppSettingsDraft {
        AppSettingsDraft {
            api_key: self.api_key.clone(),
            api_model: self.api_model.clone(),
            api_base_url: self.api_base_url.clone(),
            image_model: self.image_model.clone(),
            pass_threshold: Some(self.pass_threshold.percent()),
            quiz_length: Some(self.quiz_length.get()),
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_model: None,
            api_base_url: None,
            image_model: None,
            pass_threshold: PassThreshold::default(),
            quiz_length: default_quiz_length(),
        }
    }
}

fn default_quiz_length() -> NonZeroU8 {
    NonZeroU8::new(DEFAULT_QUIZ_LENGTH).unwrap_or(NonZeroU8::MIN)
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
