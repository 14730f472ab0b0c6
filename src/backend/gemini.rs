use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info, instrument, trace};

use crate::backend::media::{GeminiPart, build_gemini_parts};
use crate::backend::{LLMClient, MediaFile, check_response_status, handle_http_error};
use crate::error::{FontSnapError, Result};
use crate::model::Instructor;

/// Official Gemini REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini models available for completion
///
/// Any other model name can be used through `Custom` or `FromStr`:
///
/// ```rust
/// use fontsnap::GeminiModel;
/// use std::str::FromStr;
///
/// let model = GeminiModel::from_str("gemini-exp-1206").unwrap();
/// assert_eq!(model, GeminiModel::Custom("gemini-exp-1206".to_string()));
/// assert_eq!(GeminiModel::from_string("gemini-2.5-flash"), GeminiModel::Gemini25Flash);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Model {
    /// Gemini 2.5 Pro
    Gemini25Pro,
    /// Gemini 2.5 Flash
    Gemini25Flash,
    /// Gemini 2.5 Flash Lite
    Gemini25FlashLite,
    /// Gemini 2.0 Flash
    #[default]
    Gemini20Flash,
    /// Gemini 2.0 Flash Lite
    Gemini20FlashLite,
    /// Custom model name (for new models or Gemini-compatible endpoints)
    Custom(String),
}

impl Model {
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini25Pro => "gemini-2.5-pro",
            Model::Gemini25Flash => "gemini-2.5-flash",
            Model::Gemini25FlashLite => "gemini-2.5-flash-lite",
            Model::Gemini20Flash => "gemini-2.0-flash",
            Model::Gemini20FlashLite => "gemini-2.0-flash-lite",
            Model::Custom(name) => name,
        }
    }

    /// Create a model from a string. Always succeeds; unknown names become `Custom`.
    ///
    /// A leading `googleai/` provider prefix is accepted and dropped.
    pub fn from_string(name: impl Into<String>) -> Self {
        let name = name.into();
        let bare = name.strip_prefix("googleai/").unwrap_or(&name);
        match bare {
            "gemini-2.5-pro" => Model::Gemini25Pro,
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.0-flash" => Model::Gemini20Flash,
            "gemini-2.0-flash-lite" => Model::Gemini20FlashLite,
            other => Model::Custom(other.to_string()),
        }
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Model::from_string(s))
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        Model::from_string(s)
    }
}

/// Configuration for the Gemini client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: Model,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout: Option<Duration>,
    /// Custom base URL for Gemini-compatible APIs, without trailing slash
    pub base_url: Option<String>,
}

impl GeminiConfig {
    fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: Model::default(),
            temperature: 0.0,
            max_tokens: None,
            timeout: None,
            base_url: None,
        }
    }
}

/// Gemini client for generating completions
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

impl GeminiClient {
    /// Create a new Gemini client with the provided API key.
    ///
    /// ```no_run
    /// # use fontsnap::GeminiClient;
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = GeminiClient::new("your-gemini-api-key")?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(name = "gemini_client_new", skip(api_key))]
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(FontSnapError::ConfigError(
                "API key cannot be empty. Use GeminiClient::from_env() to read from GEMINI_API_KEY environment variable.".to_string(),
            ));
        }

        let config = GeminiConfig::new(api_key);
        info!(model = %config.model.as_str(), "Created Gemini client");

        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    /// Create a new Gemini client from the `GEMINI_API_KEY` environment
    /// variable, falling back to `GOOGLE_API_KEY`.
    #[instrument(name = "gemini_client_from_env")]
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| {
                FontSnapError::ConfigError(
                    "GEMINI_API_KEY environment variable is not set".to_string(),
                )
            })?;
        Self::new(api_key)
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Set the model to use
    #[instrument(skip(self))]
    pub fn model(mut self, model: Model) -> Self {
        debug!(previous_model = ?self.config.model, new_model = ?model, "Setting Gemini model");
        self.config.model = model;
        self
    }

    /// Set the temperature (0.0 to 1.0, lower = more deterministic)
    #[instrument(skip(self))]
    pub fn temperature(mut self, temp: f32) -> Self {
        debug!(previous_temp = self.config.temperature, new_temp = temp, "Setting temperature");
        self.config.temperature = temp;
        self
    }

    /// Set the maximum tokens to generate
    #[instrument(skip(self))]
    pub fn max_tokens(mut self, max: u32) -> Self {
        debug!(previous_max = ?self.config.max_tokens, new_max = max, "Setting max_tokens");
        self.config.max_tokens = Some(max.max(1));
        self
    }

    /// Set the timeout applied to each HTTP request made by the client.
    #[instrument(skip(self))]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        debug!(previous_timeout = ?self.config.timeout, new_timeout = ?timeout, "Setting timeout");
        self.config.timeout = Some(timeout);

        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(
                    error = %e,
                    "Failed to build reqwest client with timeout, using default"
                );
                reqwest::Client::new()
            });

        self
    }

    /// Set a custom base URL for Gemini-compatible APIs.
    ///
    /// * `base_url` - Base URL without trailing slash (e.g. "http://localhost:1234/v1beta")
    #[instrument(skip(self, base_url))]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        debug!(previous_base_url = ?self.config.base_url, new_base_url = %base_url, "Setting custom base URL");
        self.config.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    fn endpoint(&self) -> String {
        let base_url = self.config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        format!("{}/models/{}:generateContent", base_url, self.config.model.as_str())
    }

    /// Send one generateContent request and return the first text part.
    async fn send(&self, request: &GenerateContentRequest) -> Result<String> {
        let url = self.endpoint();
        debug!(url = %url, model = %self.config.model.as_str(), "Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.config.api_key)])
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| handle_http_error(e, "Gemini"))?;

        let response = check_response_status(response, "Gemini").await?;

        debug!("Successfully received response from Gemini API");
        let completion: GenerateContentResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse JSON response from Gemini API");
            handle_http_error(e, "Gemini")
        })?;

        if let Some(usage) = &completion.usage_metadata {
            debug!(
                input_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "Gemini token usage"
            );
        }

        let Some(candidate) = completion.candidates.into_iter().next() else {
            error!("Gemini API returned empty candidates array");
            return Err(FontSnapError::ApiError(
                "No completion candidates returned".to_string(),
            ));
        };
        trace!(finish_reason = ?candidate.finish_reason, "Completion finish reason");

        candidate
            .content
            .into_iter()
            .flat_map(|content| content.parts)
            .find_map(|part| part.text)
            .ok_or_else(|| {
                error!(finish_reason = ?candidate.finish_reason, "No text content in Gemini response");
                FontSnapError::ApiError(match &candidate.finish_reason {
                    Some(reason) => format!("No text content in response (finish reason: {})", reason),
                    None => "No text content in response".to_string(),
                })
            })
    }
}

#[async_trait]
impl LLMClient for GeminiClient {
    #[instrument(
        name = "gemini_materialize",
        skip(self, prompt, media),
        fields(
            type_name = std::any::type_name::<T>(),
            model = %self.config.model.as_str(),
            prompt_len = prompt.len(),
            media = media.len()
        )
    )]
    async fn materialize_with_media<T>(&self, prompt: &str, media: &[MediaFile]) -> Result<T>
    where
        T: Instructor + Send + 'static,
    {
        info!("Generating structured response with Gemini");

        let schema = T::schema();
        trace!(schema_name = ?T::schema_name(), schema = %schema, "Declared output schema");

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: build_gemini_parts(prompt, media)?,
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(schema.to_json().clone()),
            },
        };

        let text = self.send(&request).await?;
        trace!(content_len = text.len(), "Parsing structured response");
        let result = T::from_model_output(&text).map_err(|e| {
            error!(error = %e, "Model output failed validation");
            e
        })?;

        info!("Successfully generated and validated structured data");
        Ok(result)
    }

    #[instrument(
        name = "gemini_generate",
        skip(self, prompt),
        fields(model = %self.config.model.as_str(), prompt_len = prompt.len())
    )]
    async fn generate(&self, prompt: &str) -> Result<String> {
        info!("Generating raw text response with Gemini");

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: build_gemini_parts(prompt, &[])?,
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
                response_mime_type: None,
                response_schema: None,
            },
        };

        self.send(&request).await
    }
}
