//! Server-side actions: validate a request, run a flow, shape the answer.

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use url::Url;

use crate::acquire::ImageFetcher;
use crate::backend::LLMClient;
use crate::error::{FontSnapError, Result};
use crate::flows::{
    DescribedFont, FontSuggestion, IdentifyFontInput, SuggestFontsInput,
    identify_font_from_image, suggest_fonts_from_description,
};
use crate::media::DataUri;

pub const MISSING_IMAGE_MESSAGE: &str = "Either an image file or a URL must be provided.";
pub const INVALID_URL_MESSAGE: &str = "Invalid URL provided.";
pub const MISSING_DESCRIPTION_MESSAGE: &str = "A description of the font must be provided.";
pub const NO_DESCRIBED_FONTS_MESSAGE: &str =
    "Could not suggest any fonts. Try a different description.";

/// Input of [`FontSnap::identify_font`]. At least one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyFontRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// The effective image of a validated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    DataUri(DataUri),
    Url(Url),
}

impl IdentifyFontRequest {
    pub fn from_data_uri(uri: impl Into<String>) -> Self {
        Self {
            image_data_uri: Some(uri.into()),
            image_url: None,
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            image_data_uri: None,
            image_url: Some(url.into()),
        }
    }

    /// Resolve the request to exactly one image source.
    ///
    /// Empty strings count as absent. A data URI takes precedence over a URL;
    /// a URL is still syntax-checked when both are present. All problems are
    /// reported together, joined with `", "`.
    pub fn validate(&self) -> Result<ImageSource> {
        let data_uri = non_empty(self.image_data_uri.as_deref());
        let image_url = non_empty(self.image_url.as_deref());

        let mut problems = Vec::new();

        let parsed_url = match image_url {
            Some(raw) => match Url::parse(raw) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
                _ => {
                    problems.push(INVALID_URL_MESSAGE.to_string());
                    None
                }
            },
            None => None,
        };

        let parsed_uri = match data_uri {
            Some(raw) => match DataUri::parse(raw) {
                Ok(uri) => Some(uri),
                Err(e) => {
                    problems.push(e.user_message());
                    None
                }
            },
            None => None,
        };

        if data_uri.is_none() && image_url.is_none() {
            problems.push(MISSING_IMAGE_MESSAGE.to_string());
        }

        if !problems.is_empty() {
            return Err(FontSnapError::InvalidInput(problems.join(", ")));
        }

        match (parsed_uri, parsed_url) {
            (Some(uri), _) => Ok(ImageSource::DataUri(uri)),
            (None, Some(url)) => Ok(ImageSource::Url(url)),
            (None, None) => Err(FontSnapError::InvalidInput(MISSING_IMAGE_MESSAGE.to_string())),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Input of [`FontSnap::suggest_fonts`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestFontsRequest {
    #[serde(default)]
    pub description: String,
}

/// Result of an action: suggestions on success, one user-facing string otherwise.
///
/// Serializes as `{"suggestions": [...]}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionOutcome<T> {
    Suggestions { suggestions: Vec<T> },
    Error { error: String },
}

impl<T> ActionOutcome<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn suggestions(&self) -> Option<&[T]> {
        match self {
            Self::Suggestions { suggestions } => Some(suggestions),
            Self::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { error } => Some(error),
            Self::Suggestions { .. } => None,
        }
    }
}

/// The FontSnap service: a model client plus an image fetcher.
///
/// Holds no per-request state, so one instance can be shared behind an
/// `Arc` by every request handler.
pub struct FontSnap<C> {
    client: C,
    fetcher: ImageFetcher,
}

impl<C: LLMClient> FontSnap<C> {
    pub fn new(client: C) -> Self {
        Self::with_fetcher(client, ImageFetcher::new())
    }

    pub fn with_fetcher(client: C, fetcher: ImageFetcher) -> Self {
        Self { client, fetcher }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Identify the fonts in the requested image.
    #[instrument(skip(self, request), fields(
        has_data_uri = request.image_data_uri.is_some(),
        has_url = request.image_url.is_some()
    ))]
    pub async fn identify_font(&self, request: &IdentifyFontRequest) -> ActionOutcome<FontSuggestion> {
        match self.try_identify_font(request).await {
            Ok(suggestions) => {
                info!(count = suggestions.len(), "Identified fonts");
                ActionOutcome::Suggestions { suggestions }
            }
            Err(e) => {
                match e.category() {
                    crate::ErrorCategory::InvalidInput => warn!(error = %e, "Rejected request"),
                    _ => error!(error = %e, category = ?e.category(), "Font identification failed"),
                }
                ActionOutcome::error(e.user_message())
            }
        }
    }

    /// Like [`identify_font`](Self::identify_font), keeping the typed error.
    pub async fn try_identify_font(
        &self,
        request: &IdentifyFontRequest,
    ) -> Result<Vec<FontSuggestion>> {
        let photo_data_uri = match request.validate()? {
            ImageSource::DataUri(uri) => uri,
            ImageSource::Url(url) => self.fetcher.fetch_data_uri(&url).await?,
        };

        let output =
            identify_font_from_image(&self.client, &IdentifyFontInput { photo_data_uri }).await?;
        if output.suggestions.is_empty() {
            return Err(FontSnapError::NoSuggestions);
        }
        Ok(output.suggestions)
    }

    /// Suggest fonts matching a free-text description.
    #[instrument(skip(self, request))]
    pub async fn suggest_fonts(&self, request: &SuggestFontsRequest) -> ActionOutcome<DescribedFont> {
        let description = request.description.trim();
        if description.is_empty() {
            warn!("Rejected empty description");
            return ActionOutcome::error(MISSING_DESCRIPTION_MESSAGE);
        }

        let input = SuggestFontsInput {
            description: description.to_string(),
        };
        match suggest_fonts_from_description(&self.client, &input).await {
            Ok(output) if output.suggestions.is_empty() => {
                ActionOutcome::error(NO_DESCRIBED_FONTS_MESSAGE)
            }
            Ok(output) => {
                info!(count = output.suggestions.len(), "Suggested fonts");
                ActionOutcome::Suggestions {
                    suggestions: output.suggestions,
                }
            }
            Err(e) => {
                error!(error = %e, "Font suggestion failed");
                ActionOutcome::error(e.user_message())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_a_source() {
        let err = IdentifyFontRequest::default().validate().unwrap_err();
        assert_eq!(err, FontSnapError::InvalidInput(MISSING_IMAGE_MESSAGE.into()));

        let blank = IdentifyFontRequest {
            image_data_uri: Some("  ".into()),
            image_url: Some(String::new()),
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        for raw in ["not a url", "ftp://example.com/a.png", "/relative.png"] {
            let err = IdentifyFontRequest::from_url(raw).validate().unwrap_err();
            assert_eq!(err, FontSnapError::InvalidInput(INVALID_URL_MESSAGE.into()));
        }
    }

    #[test]
    fn test_validate_joins_problems() {
        let request = IdentifyFontRequest {
            image_data_uri: Some("data:nope".into()),
            image_url: Some("nope".into()),
        };
        assert_eq!(
            request.validate().unwrap_err(),
            FontSnapError::InvalidInput(
                "Invalid URL provided., Invalid image data URI.".into()
            )
        );
    }

    #[test]
    fn test_data_uri_wins_over_url() {
        let request = IdentifyFontRequest {
            image_data_uri: Some("data:image/png;base64,YWJj".into()),
            image_url: Some("https://example.com/a.png".into()),
        };
        match request.validate().unwrap() {
            ImageSource::DataUri(uri) => assert_eq!(uri.to_string(), "data:image/png;base64,YWJj"),
            other => panic!("expected data URI, got {:?}", other),
        }
    }

    #[test]
    fn test_outcome_serializes_untagged() {
        let ok: ActionOutcome<u8> = ActionOutcome::Suggestions { suggestions: vec![1] };
        assert_eq!(serde_json::to_value(&ok).unwrap(), serde_json::json!({ "suggestions": [1] }));

        let err: ActionOutcome<u8> = ActionOutcome::error("boom");
        assert_eq!(serde_json::to_value(&err).unwrap(), serde_json::json!({ "error": "boom" }));
        assert_eq!(err.error_message(), Some("boom"));
    }

    #[test]
    fn test_request_accepts_camel_case_json() {
        let request: IdentifyFontRequest =
            serde_json::from_str(r#"{"imageUrl":"https://example.com/a.png"}"#).unwrap();
        assert_eq!(request, IdentifyFontRequest::from_url("https://example.com/a.png"));
    }
}
