use serde::Serialize;

use crate::error::{FontSnapError, Result};
use crate::media::DataUri;

/// A piece of media attached to a prompt.
///
/// Either `data` holds an inline base64 payload, or `uri` points at a file
/// the provider can read itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub uri: String,
    pub mime_type: String,
    pub data: Option<String>,
}

impl MediaFile {
    /// Reference media by URI.
    pub fn new(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: mime_type.into(),
            data: None,
        }
    }

    /// Inline raw bytes, base64-encoded.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self::from_data_uri(&DataUri::from_bytes(bytes, mime_type))
    }

    pub fn from_data_uri(uri: &DataUri) -> Self {
        Self {
            uri: String::new(),
            mime_type: uri.mime_type().to_string(),
            data: Some(uri.data().to_string()),
        }
    }

    /// The inline payload as a data URI, if this media is inline.
    pub fn to_data_uri(&self) -> Option<String> {
        self.data
            .as_ref()
            .map(|data| format!("data:{};base64,{}", self.mime_type, data))
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub(crate) enum GeminiPart {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: GeminiBlob,
    },
    #[serde(rename_all = "camelCase")]
    FileData {
        file_data: GeminiFileData,
    },
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiBlob {
    pub(crate) mime_type: String,
    pub(crate) data: String,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiFileData {
    pub(crate) mime_type: String,
    pub(crate) file_uri: String,
}

/// Build the parts of one Gemini user turn: prompt text first, then media.
pub(crate) fn build_gemini_parts(prompt: &str, media: &[MediaFile]) -> Result<Vec<GeminiPart>> {
    let mut parts = Vec::with_capacity(media.len() + 1);
    if !prompt.is_empty() {
        parts.push(GeminiPart::Text {
            text: prompt.to_string(),
        });
    }

    for file in media {
        if file.mime_type.is_empty() {
            return Err(FontSnapError::ApiError(
                "MediaFile mime_type cannot be empty".to_string(),
            ));
        }
        match file.data.as_ref() {
            Some(data) if data.is_empty() => {
                return Err(FontSnapError::ApiError(
                    "MediaFile inline data cannot be empty".to_string(),
                ));
            }
            Some(data) => parts.push(GeminiPart::InlineData {
                inline_data: GeminiBlob {
                    mime_type: file.mime_type.clone(),
                    data: data.clone(),
                },
            }),
            None if !file.uri.is_empty() => parts.push(GeminiPart::FileData {
                file_data: GeminiFileData {
                    mime_type: file.mime_type.clone(),
                    file_uri: file.uri.clone(),
                },
            }),
            None => {
                return Err(FontSnapError::ApiError(
                    "MediaFile must include either inline data or uri".to_string(),
                ));
            }
        }
    }

    Ok(parts)
}
