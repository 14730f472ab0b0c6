use thiserror::Error;

/// Message shown when an image URL could not be turned into a data URI.
pub const FETCH_FAILURE_MESSAGE: &str = "Could not process the image from the provided URL. Please check the URL or try uploading the image directly.";

/// Message shown when the model returns an empty suggestion list.
pub const NO_FONTS_MESSAGE: &str = "Could not identify any fonts. Try a different image.";

/// Fallback message for failures that carry no useful text of their own.
pub const UNEXPECTED_ERROR_MESSAGE: &str =
    "An unexpected error occurred during font identification.";

/// Error types for FontSnap.
///
/// Every failure is scoped to a single request. Callers that need a
/// user-facing string should use [`FontSnapError::user_message`]; the
/// `Display` text keeps the descriptive cause for logs.
///
/// # Examples
///
/// ```
/// use fontsnap::{ErrorCategory, FontSnapError, Result};
///
/// fn require_url(url: Option<&str>) -> Result<&str> {
///     url.ok_or_else(|| FontSnapError::InvalidInput("Invalid URL provided.".into()))
/// }
///
/// let err = require_url(None).unwrap_err();
/// assert_eq!(err.category(), ErrorCategory::InvalidInput);
/// assert_eq!(err.user_message(), "Invalid URL provided.");
/// ```
#[derive(Error, Debug)]
pub enum FontSnapError {
    /// Request input was missing or malformed
    #[error("{0}")]
    InvalidInput(String),

    /// The image URL could not be fetched or did not point to an image
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// Error interacting with the model provider's API
    #[error("API error: {0}")]
    ApiError(String),

    /// Model output did not match the declared schema
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error related to JSON Schema generation or processing
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// The model answered with an empty suggestion list
    #[error("{}", NO_FONTS_MESSAGE)]
    NoSuggestions,

    /// The model request timed out
    #[error("Timeout error")]
    Timeout,

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP client error (from reqwest)
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error (from serde_json)
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Coarse grouping of errors, mirroring how they are reported to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidInput,
    Fetch,
    Model,
    Internal,
}

impl FontSnapError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput(_) => ErrorCategory::InvalidInput,
            Self::FetchError(_) => ErrorCategory::Fetch,
            Self::ApiError(_) | Self::ValidationError(_) | Self::NoSuggestions | Self::Timeout => {
                ErrorCategory::Model
            }
            Self::SchemaError(_)
            | Self::ConfigError(_)
            | Self::HttpError(_)
            | Self::JsonError(_) => ErrorCategory::Internal,
        }
    }

    /// The single string surfaced to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(msg) => msg.clone(),
            Self::FetchError(_) => FETCH_FAILURE_MESSAGE.to_string(),
            Self::NoSuggestions => NO_FONTS_MESSAGE.to_string(),
            other => {
                let text = other.to_string();
                if text.trim().is_empty() {
                    UNEXPECTED_ERROR_MESSAGE.to_string()
                } else {
                    text
                }
            }
        }
    }
}

// HttpError and JsonError never compare equal: their sources don't implement PartialEq
impl PartialEq for FontSnapError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::FetchError(a), Self::FetchError(b)) => a == b,
            (Self::ApiError(a), Self::ApiError(b)) => a == b,
            (Self::ValidationError(a), Self::ValidationError(b)) => a == b,
            (Self::SchemaError(a), Self::SchemaError(b)) => a == b,
            (Self::ConfigError(a), Self::ConfigError(b)) => a == b,
            (Self::NoSuggestions, Self::NoSuggestions) => true,
            (Self::Timeout, Self::Timeout) => true,
            _ => false,
        }
    }
}

/// A specialized Result type for FontSnap operations.
pub type Result<T> = std::result::Result<T, FontSnapError>;
