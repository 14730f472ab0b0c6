use async_trait::async_trait;

use crate::backend::MediaFile;
use crate::error::Result;
use crate::model::Instructor;

/// LLMClient defines the interface to a generative model provider.
///
/// An implementation sends a prompt, optionally with inline media, asks the
/// model for output matching `T`'s JSON schema, and returns the parsed and
/// validated value. One request is made per call; nothing is retried.
///
/// [`GeminiClient`](crate::GeminiClient) is the bundled implementation. Tests
/// and alternative providers can implement the trait directly.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use fontsnap::{DataUri, FontSuggestions, GeminiClient, LLMClient, MediaFile};
///
/// let client = GeminiClient::from_env()?.temperature(0.0);
/// let image = DataUri::parse("data:image/png;base64,iVBORw0KGgo=")?;
///
/// let result: FontSuggestions = client
///     .materialize_with_media("Which font is this?", &[MediaFile::from_data_uri(&image)])
///     .await?;
/// println!("{} suggestions", result.suggestions.len());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a structured value of type `T` from a text-only prompt.
    async fn materialize<T>(&self, prompt: &str) -> Result<T>
    where
        T: Instructor + Send + 'static,
    {
        self.materialize_with_media::<T>(prompt, &[]).await
    }

    /// Generate a structured value of type `T` from a prompt plus media parts.
    ///
    /// The media are sent alongside the prompt text in the same user turn.
    async fn materialize_with_media<T>(&self, prompt: &str, media: &[MediaFile]) -> Result<T>
    where
        T: Instructor + Send + 'static;

    /// Raw completion without structure (returns plain text).
    async fn generate(&self, prompt: &str) -> Result<String>;
}
