use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};

use crate::backend::{LLMClient, MediaFile};
use crate::error::Result;
use crate::media::DataUri;
use crate::model::Instructor;
use crate::schema::{Schema, SchemaBuilder, SchemaType};

/// Instruction sent with every image.
pub const IDENTIFY_PROMPT: &str = "You are a font identification expert. Given an image of text, identify the font and provide the top three most probable matches, including a confidence level (0-1) and a link to where the font can be obtained. Respond in JSON format.

Ensure the confidence level is a floating point number between 0 and 1.";

/// A photo containing text, as a base64 data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifyFontInput {
    pub photo_data_uri: DataUri,
}

/// One font match proposed by the model.
///
/// `confidence_level` is whatever the model returned; it is not range-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSuggestion {
    pub font_name: String,
    pub confidence_level: f64,
    pub purchase_link: String,
}

/// The structured answer of the identify flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSuggestions {
    pub suggestions: Vec<FontSuggestion>,
}

impl SchemaType for FontSuggestions {
    fn schema() -> Schema {
        let suggestion = SchemaBuilder::object()
            .property(
                "fontName",
                json!({ "type": "string", "description": "The name of the suggested font." }),
                true,
            )
            .property(
                "confidenceLevel",
                json!({
                    "type": "number",
                    "description": "The confidence level of the suggestion (0-1)."
                }),
                true,
            )
            .property(
                "purchaseLink",
                json!({
                    "type": "string",
                    "description": "A link to where the font can be obtained."
                }),
                true,
            )
            .build_value();

        SchemaBuilder::object()
            .property(
                "suggestions",
                SchemaBuilder::array(suggestion)
                    .description("The top three most probable font matches.")
                    .build_value(),
                true,
            )
            .build()
    }

    fn schema_name() -> Option<String> {
        Some("identify_font_from_image_output".to_string())
    }
}

impl Instructor for FontSuggestions {}

/// Ask the model which fonts appear in the image.
///
/// The image travels as an inline media part carrying exactly the input
/// data URI.
#[instrument(skip(client, input), fields(mime_type = %input.photo_data_uri.mime_type()))]
pub async fn identify_font_from_image<C>(
    client: &C,
    input: &IdentifyFontInput,
) -> Result<FontSuggestions>
where
    C: LLMClient,
{
    let media = [MediaFile::from_data_uri(&input.photo_data_uri)];
    let output: FontSuggestions = client
        .materialize_with_media(IDENTIFY_PROMPT, &media)
        .await?;
    info!(count = output.suggestions.len(), "Font identification finished");
    Ok(output)
}
