use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DataUriError {
    #[error("data URI must start with `data:`")]
    MissingScheme,

    #[error("data URI must be base64 encoded")]
    NotBase64,

    #[error("unsupported media type `{0}`; expected image/*")]
    NotAnImage(String),

    #[error("data URI payload is empty")]
    EmptyPayload,

    #[error("invalid base64 payload")]
    InvalidPayload,
}

/// An inline image as `data:<mime>;base64,<payload>`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageDataUri {
    mime: String,
    payload: String,
}

impl ImageDataUri {
    /// # Errors
    ///
    /// Returns `DataUriError` if the string is not a base64 image data URI.
    pub fn parse(raw: &str) -> Result<Self, DataUriError> {
        let rest = raw
            .trim()
            .strip_prefix("data:")
            .ok_or(DataUriError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUriError::NotBase64)?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or(DataUriError::NotBase64)?;

        let mime = mime.to_ascii_lowercase();
        if !mime.starts_with("image/") || mime.len() == "image/".len() {
            return Err(DataUriError::NotAnImage(mime));
        }
        if payload.is_empty() {
            return Err(DataUriError::EmptyPayload);
        }
        STANDARD
            .decode(payload)
            .map_err(|_| DataUriError::InvalidPayload)?;

        Ok(Self {
            mime,
            payload: payload.to_string(),
        })
    }

    /// Encode raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns `DataUriError` if `mime` is not an image type or `bytes` is empty.
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Result<Self, DataUriError> {
        let mime = mime.trim().to_ascii_lowercase();
        if !mime.starts_with("image/") || mime.len() == "image/".len() {
            return Err(DataUriError::NotAnImage(mime));
        }
        if bytes.is_empty() {
            return Err(DataUriError::EmptyPayload);
        }
        Ok(Self {
            mime,
            payload: STANDARD.encode(bytes),
        })
    }

    /// Guess the image mime type from a file extension.
    #[must_use]
    pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some("image/png"),
            "jpg" | "jpeg" => Some("image/jpeg"),
            "gif" => Some("image/gif"),
            "webp" => Some("image/webp"),
            "bmp" => Some("image/bmp"),
            "svg" => Some("image/svg+xml"),
            _ => None,
        }
    }

    #[must_use]
    pub fn mime(&self) -> &str {
        &self.mime
    }

    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    #[must_use]
    pub fn as_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.payload)
    }
}

impl fmt::Display for ImageDataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime, self.payload)
    }
}

impl fmt::Debug for ImageDataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageDataUri")
            .field("mime", &self.mime)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

impl FromStr for ImageDataUri {
    type Err = DataUriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ImageDataUri {
    type Error = DataUriError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ImageDataUri> for String {
    fn from(uri: ImageDataUri) -> Self {
        uri.as_uri()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_png_data_uri() {
        let uri = ImageDataUri::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(uri.mime(), "image/png");
        assert_eq!(uri.payload(), "iVBORw0KGgo=");
        assert_eq!(uri.to_string(), "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn rejects_non_image_and_non_base64() {
        assert_eq!(
            ImageDataUri::parse("data:text/plain;base64,aGk=").unwrap_err(),
            DataUriError::NotAnImage("text/plain".into())
        );
        assert_eq!(
            ImageDataUri::parse("data:image/png,raw").unwrap_err(),
            DataUriError::NotBase64
        );
        assert_eq!(
            ImageDataUri::parse("https://example.com/a.png").unwrap_err(),
            DataUriError::MissingScheme
        );
        assert_eq!(
            ImageDataUri::parse("data:image/png;base64,").unwrap_err(),
            DataUriError::EmptyPayload
        );
        assert_eq!(
            ImageDataUri::parse("data:image/png;base64,@@@").unwrap_err(),
            DataUriError::InvalidPayload
        );
    }

    #[test]
    fn encodes_bytes() {
        let uri = ImageDataUri::from_bytes("image/jpeg", b"hi").unwrap();
        assert_eq!(uri.as_uri(), "data:image/jpeg;base64,aGk=");
        assert!(ImageDataUri::from_bytes("image/jpeg", b"").is_err());
    }

    #[test]
    fn extension_lookup() {
        assert_eq!(ImageDataUri::mime_for_extension("JPG"), Some("image/jpeg"));
        assert_eq!(ImageDataUri::mime_for_extension("txt"), None);
    }
}
