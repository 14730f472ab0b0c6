//! Data URIs: `data:<mime type>;base64,<payload>`.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::{FontSnapError, Result};

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// An image carried inline as a base64 data URI.
///
/// Only the base64 form is accepted; the payload is checked to decode but
/// kept in its encoded form, since that is what gets forwarded to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    mime_type: String,
    data: String,
}

impl DataUri {
    /// Encode raw bytes under the given MIME type.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` string.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || FontSnapError::InvalidInput("Invalid image data URI.".to_string());

        let rest = input.trim().strip_prefix(DATA_PREFIX).ok_or_else(invalid)?;
        let (mime_type, data) = rest.split_once(BASE64_MARKER).ok_or_else(invalid)?;

        if mime_type.is_empty() || !mime_type.contains('/') || data.is_empty() {
            return Err(invalid());
        }
        STANDARD.decode(data).map_err(|_| invalid())?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 payload, without the `data:` header.
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| FontSnapError::InvalidInput(format!("Invalid base64 payload: {}", e)))
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{}", DATA_PREFIX, self.mime_type, BASE64_MARKER, self.data)
    }
}

impl FromStr for DataUri {
    type Err = FontSnapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Guess the MIME type of an image from its magic bytes, falling back to
/// the file extension. Returns `None` unless the result is `image/*`.
pub fn guess_image_mime(bytes: &[u8], path: Option<&Path>) -> Option<String> {
    let mime = infer::get(bytes)
        .map(|kind| kind.mime_type().to_string())
        .or_else(|| {
            path.and_then(|p| mime_guess::from_path(p).first_raw())
                .map(str::to_string)
        })?;
    mime.starts_with("image/").then_some(mime)
}
