use std::sync::Mutex;

use async_trait::async_trait;
use fontsnap::{FontSnapError, Instructor, LLMClient, MediaFile, Result};

pub const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

#[allow(dead_code)]
pub const THREE_FONTS: &str = r#"{"suggestions":[
  {"fontName":"Helvetica Neue","confidenceLevel":0.873,"purchaseLink":"https://www.myfonts.com/collections/helvetica-neue-font-linotype"},
  {"fontName":"Arial","confidenceLevel":0.61,"purchaseLink":"https://www.fonts.com/font/monotype/arial"},
  {"fontName":"Inter","confidenceLevel":0.4,"purchaseLink":"https://fonts.google.com/specimen/Inter"}
]}"#;

#[allow(dead_code)]
pub const NO_FONTS: &str = r#"{"suggestions":[]}"#;

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub media: Vec<MediaFile>,
}

/// Answers every request with a canned model response and records what it was sent.
#[allow(dead_code)]
pub struct RecordingClient {
    response: std::result::Result<String, String>,
    calls: Mutex<Vec<RecordedCall>>,
}

#[allow(dead_code)]
impl RecordingClient {
    pub fn answering(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMClient for RecordingClient {
    async fn materialize_with_media<T>(&self, prompt: &str, media: &[MediaFile]) -> Result<T>
    where
        T: Instructor + Send + 'static,
    {
        self.calls.lock().unwrap().push(RecordedCall {
            prompt: prompt.to_string(),
            media: media.to_vec(),
        });
        match &self.response {
            Ok(text) => T::from_model_output(text),
            Err(message) => Err(FontSnapError::ApiError(message.clone())),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            prompt: prompt.to_string(),
            media: Vec::new(),
        });
        self.response.clone().map_err(FontSnapError::ApiError)
    }
}
