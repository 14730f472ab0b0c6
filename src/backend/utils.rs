use crate::error::{FontSnapError, Result};
use reqwest::Response;
use tracing::error;

/// Convert a reqwest error to a FontSnapError, handling timeout errors specially.
pub fn handle_http_error(e: reqwest::Error, provider_name: &str) -> FontSnapError {
    error!(error = %e, "HTTP request to {} failed", provider_name);
    if e.is_timeout() {
        FontSnapError::Timeout
    } else {
        FontSnapError::HttpError(e)
    }
}

/// Check HTTP response status and extract error message if unsuccessful.
pub async fn check_response_status(response: Response, provider_name: &str) -> Result<Response> {
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await?;
        error!(
            status = %status,
            error = %error_text,
            "{} API returned error response", provider_name
        );
        return Err(FontSnapError::ApiError(format!(
            "{} API error ({}): {}",
            provider_name, status, error_text
        )));
    }
    Ok(response)
}
