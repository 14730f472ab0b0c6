/// FontSnap: identify the font in an image with a generative AI model.
///
/// # Overview
///
/// FontSnap takes an image (inline as a data URI, or by URL), sends it to a
/// Gemini model together with a fixed prompt and a declared JSON schema, and
/// returns up to three font matches with confidence levels and purchase
/// links. A second flow suggests fonts for a free-text description.
///
/// - [`ImageFetcher`] turns an image URL into a [`DataUri`]
/// - [`identify_font_from_image`] and [`suggest_fonts_from_description`]
///   build the prompts and call any [`LLMClient`]
/// - [`Instructor`] checks model output against its schema
/// - [`FontSnap`] wraps all of it as the `{ suggestions } | { error }` actions
/// - [`server::create_app`] serves the HTML form and JSON API
///
/// # Quick Start
///
/// ```no_run
/// use fontsnap::{FontSnap, GeminiClient, IdentifyFontRequest};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let service = FontSnap::new(GeminiClient::from_env()?);
///
///     let outcome = service
///         .identify_font(&IdentifyFontRequest::from_url("https://example.com/poster.png"))
///         .await;
///
///     match outcome.suggestions() {
///         Some(fonts) => {
///             for font in fonts {
///                 println!("{} ({}%)", font.font_name, fontsnap::render::confidence_percent(font.confidence_level));
///             }
///         }
///         None => eprintln!("{}", outcome.error_message().unwrap_or_default()),
///     }
///     Ok(())
/// }
/// ```
pub mod acquire;
pub mod action;
mod backend;
pub mod config;
mod error;
pub mod flows;
#[cfg(feature = "logging")]
pub mod logging;
pub mod media;
pub mod model;
pub mod render;
pub mod schema;
pub mod server;

// Re-exports for convenience
pub use acquire::ImageFetcher;
pub use action::{ActionOutcome, FontSnap, IdentifyFontRequest, ImageSource, SuggestFontsRequest};
pub use backend::{GeminiClient, GeminiConfig, GeminiModel, LLMClient, MediaFile};
pub use config::FontSnapConfig;
pub use error::{ErrorCategory, FontSnapError, Result};
pub use flows::{
    DescribedFont, FontSuggestion, FontSuggestions, IdentifyFontInput, SuggestFontsInput,
    SuggestFontsOutput, identify_font_from_image, suggest_fonts_from_description,
};
pub use media::DataUri;
pub use model::Instructor;
pub use schema::{Schema, SchemaBuilder, SchemaType};
