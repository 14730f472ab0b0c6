//! Runtime configuration, read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use tracing::{debug, info};

use crate::acquire::ImageFetcher;
use crate::action::FontSnap;
use crate::backend::{GeminiClient, GeminiModel};
use crate::error::{FontSnapError, Result};
use crate::server::DEFAULT_BODY_LIMIT;

pub const DEFAULT_BIND: &str = "127.0.0.1:9002";

/// Settings shared by the CLI and the server.
///
/// | Variable | Field |
/// |---|---|
/// | `GEMINI_API_KEY` (or `GOOGLE_API_KEY`) | `api_key` |
/// | `FONTSNAP_MODEL` | `model` |
/// | `FONTSNAP_BASE_URL` | `base_url` |
/// | `FONTSNAP_BIND` | `bind` |
/// | `FONTSNAP_FETCH_TIMEOUT_SECS` | `fetch_timeout` |
/// | `FONTSNAP_MODEL_TIMEOUT_SECS` | `model_timeout` |
/// | `FONTSNAP_MAX_IMAGE_BYTES` | `max_image_bytes` |
/// | `FONTSNAP_BODY_LIMIT_BYTES` | `body_limit` |
#[derive(Debug, Clone, PartialEq)]
pub struct FontSnapConfig {
    pub api_key: Option<String>,
    pub model: GeminiModel,
    pub base_url: Option<String>,
    pub bind: SocketAddr,
    pub fetch_timeout: Option<Duration>,
    pub model_timeout: Option<Duration>,
    pub max_image_bytes: Option<usize>,
    pub body_limit: usize,
}

impl Default for FontSnapConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: GeminiModel::default(),
            base_url: None,
            bind: SocketAddr::from(([127, 0, 0, 1], 9002)),
            fetch_timeout: None,
            model_timeout: None,
            max_image_bytes: None,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl FontSnapConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset and empty values keep the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        config.api_key = get("GEMINI_API_KEY").or_else(|| get("GOOGLE_API_KEY"));
        if let Some(model) = get("FONTSNAP_MODEL") {
            config.model = GeminiModel::from_string(model);
        }
        config.base_url = get("FONTSNAP_BASE_URL");
        if let Some(bind) = get("FONTSNAP_BIND") {
            config.bind = parse_value("FONTSNAP_BIND", &bind)?;
        }
        if let Some(secs) = get("FONTSNAP_FETCH_TIMEOUT_SECS") {
            config.fetch_timeout =
                Some(Duration::from_secs(parse_value("FONTSNAP_FETCH_TIMEOUT_SECS", &secs)?));
        }
        if let Some(secs) = get("FONTSNAP_MODEL_TIMEOUT_SECS") {
            config.model_timeout =
                Some(Duration::from_secs(parse_value("FONTSNAP_MODEL_TIMEOUT_SECS", &secs)?));
        }
        if let Some(bytes) = get("FONTSNAP_MAX_IMAGE_BYTES") {
            config.max_image_bytes = Some(parse_value("FONTSNAP_MAX_IMAGE_BYTES", &bytes)?);
        }
        if let Some(bytes) = get("FONTSNAP_BODY_LIMIT_BYTES") {
            config.body_limit = parse_value("FONTSNAP_BODY_LIMIT_BYTES", &bytes)?;
        }

        debug!(model = %config.model.as_str(), bind = %config.bind, "Loaded configuration");
        Ok(config)
    }

    pub fn build_client(&self) -> Result<GeminiClient> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            FontSnapError::ConfigError(
                "GEMINI_API_KEY environment variable is not set".to_string(),
            )
        })?;

        let mut client = GeminiClient::new(api_key)?
            .model(self.model.clone())
            .temperature(0.0);
        if let Some(base_url) = &self.base_url {
            client = client.base_url(base_url.clone());
        }
        if let Some(timeout) = self.model_timeout {
            client = client.timeout(timeout);
        }
        Ok(client)
    }

    pub fn build_fetcher(&self) -> ImageFetcher {
        let mut fetcher = ImageFetcher::new();
        if let Some(timeout) = self.fetch_timeout {
            fetcher = fetcher.timeout(timeout);
        }
        if let Some(max_bytes) = self.max_image_bytes {
            fetcher = fetcher.max_bytes(max_bytes);
        }
        fetcher
    }

    pub fn build_service(&self) -> Result<FontSnap<GeminiClient>> {
        let service = FontSnap::with_fetcher(self.build_client()?, self.build_fetcher());
        info!(model = %self.model.as_str(), "FontSnap service ready");
        Ok(service)
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| FontSnapError::ConfigError(format!("{key}: invalid value '{raw}': {e}")))
}
