//! Image acquisition: turn an image URL into a data URI.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::error::{FontSnapError, Result};
use crate::media::DataUri;

/// Cause recorded when the image host does not answer within the timeout.
pub const FETCH_TIMEOUT_MESSAGE: &str = "Timed out fetching image.";

/// Fetches remote images and re-encodes them inline.
///
/// By default there is no timeout and no size limit; both can be set with
/// the builder methods. A failed fetch is never retried.
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    client: reqwest::Client,
    timeout: Option<Duration>,
    max_bytes: Option<usize>,
}

impl Default for ImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: None,
            max_bytes: None,
        }
    }

    /// Set a per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build reqwest client with timeout, using default");
                reqwest::Client::new()
            });
        self
    }

    /// Refuse images larger than `max_bytes`.
    pub fn max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// GET `url` and return its body as a `data:<content-type>;base64,...` URI.
    ///
    /// Fails when the status is not a success or the content type does not
    /// start with `image/`.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_data_uri(&self, url: &Url) -> Result<DataUri> {
        debug!("Fetching image");
        let mut response = self.client.get(url.clone()).send().await.map_err(|e| {
            error!(error = %e, "Image request failed");
            if e.is_timeout() {
                FontSnapError::FetchError(FETCH_TIMEOUT_MESSAGE.to_string())
            } else {
                FontSnapError::FetchError(format!("Failed to fetch image: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or(status.as_str());
            error!(status = %status, "Image host returned an error status");
            return Err(FontSnapError::FetchError(format!(
                "Failed to fetch image: {}",
                reason
            )));
        }

        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|essence| essence.trim().to_ascii_lowercase())
            .filter(|essence| essence.starts_with("image/"))
            .ok_or_else(|| {
                error!("Response content type is not an image");
                FontSnapError::FetchError("URL does not point to a valid image.".to_string())
            })?;

        if let (Some(limit), Some(length)) = (self.max_bytes, response.content_length()) {
            if length > limit as u64 {
                return Err(self.too_large(limit));
            }
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| {
            if e.is_timeout() {
                FontSnapError::FetchError(FETCH_TIMEOUT_MESSAGE.to_string())
            } else {
                FontSnapError::FetchError(format!("Failed to read image body: {}", e))
            }
        })? {
            bytes.extend_from_slice(&chunk);
            if let Some(limit) = self.max_bytes {
                if bytes.len() > limit {
                    return Err(self.too_large(limit));
                }
            }
        }

        info!(mime_type = %mime_type, size = bytes.len(), "Fetched image");
        Ok(DataUri::from_bytes(&bytes, mime_type))
    }

    fn too_large(&self, limit: usize) -> FontSnapError {
        error!(limit, "Image exceeds size limit");
        FontSnapError::FetchError(format!(
            "Image exceeds the maximum size of {} bytes.",
            limit
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn url(server: &MockServer, path: &str) -> Url {
        Url::parse(&server.url(path)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_encodes_image_as_data_uri() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/sign.png");
            then.status(200)
                .header("Content-Type", "image/png")
                .body("abc");
        });

        let uri = ImageFetcher::new()
            .fetch_data_uri(&url(&server, "/sign.png"))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(uri.to_string(), "data:image/png;base64,YWJj");
    }

    #[tokio::test]
    async fn test_fetch_drops_content_type_parameters() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/sign.svg");
            then.status(200)
                .header("Content-Type", "image/svg+xml; charset=utf-8")
                .body("<svg/>");
        });

        let uri = ImageFetcher::new()
            .fetch_data_uri(&url(&server, "/sign.svg"))
            .await
            .unwrap();
        assert_eq!(uri.mime_type(), "image/svg+xml");
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_image_content_type() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/page");
            then.status(200)
                .header("Content-Type", "text/html")
                .body("<html></html>");
        });

        let err = ImageFetcher::new()
            .fetch_data_uri(&url(&server, "/page"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            FontSnapError::FetchError("URL does not point to a valid image.".into())
        );
    }

    #[tokio::test]
    async fn test_fetch_rejects_missing_content_type() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/blob");
            then.status(200).body("abc");
        });

        let err = ImageFetcher::new()
            .fetch_data_uri(&url(&server, "/blob"))
            .await
            .unwrap_err();
        assert_eq!(err.category(), crate::ErrorCategory::Fetch);
    }

    #[tokio::test]
    async fn test_fetch_reports_http_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing.png");
            then.status(404);
        });

        let err = ImageFetcher::new()
            .fetch_data_uri(&url(&server, "/missing.png"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            FontSnapError::FetchError("Failed to fetch image: Not Found".into())
        );
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_a_fetch_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow.png");
            then.status(200)
                .header("Content-Type", "image/png")
                .delay(Duration::from_millis(1500))
                .body("abc");
        });

        let err = ImageFetcher::new()
            .timeout(Duration::from_millis(200))
            .fetch_data_uri(&url(&server, "/slow.png"))
            .await
            .unwrap_err();
        assert_eq!(err, FontSnapError::FetchError(FETCH_TIMEOUT_MESSAGE.into()));
        assert_eq!(err.category(), crate::ErrorCategory::Fetch);
    }

    #[tokio::test]
    async fn test_fetch_enforces_size_limit() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/big.png");
            then.status(200)
                .header("Content-Type", "image/png")
                .body(vec![0u8; 64]);
        });

        let err = ImageFetcher::new()
            .max_bytes(16)
            .fetch_data_uri(&url(&server, "/big.png"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            FontSnapError::FetchError("Image exceeds the maximum size of 16 bytes.".into())
        );
    }
}
