use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};

use crate::backend::LLMClient;
use crate::error::Result;
use crate::model::Instructor;
use crate::schema::{Schema, SchemaBuilder, SchemaType};

/// Prompt template; `{description}` is replaced with the user's text.
pub const DESCRIBE_PROMPT: &str = "You are a font expert. Given the following description, suggest three fonts that match the description.

Description: {description}

For each font, provide the font name, a confidence level (0-1), and a URL where the font can be purchased.
Return the output as a JSON object.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestFontsInput {
    pub description: String,
}

impl SuggestFontsInput {
    pub fn prompt(&self) -> String {
        DESCRIBE_PROMPT.replace("{description}", &self.description)
    }
}

/// A font proposed for a text description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribedFont {
    pub font_name: String,
    pub confidence: f64,
    pub purchase_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestFontsOutput {
    pub suggestions: Vec<DescribedFont>,
}

impl SchemaType for SuggestFontsOutput {
    fn schema() -> Schema {
        let font = SchemaBuilder::object()
            .property(
                "fontName",
                json!({ "type": "string", "description": "The name of the font." }),
                true,
            )
            .property(
                "confidence",
                json!({
                    "type": "number",
                    "description": "The confidence level of the suggestion (0-1)."
                }),
                true,
            )
            .property(
                "purchaseUrl",
                json!({
                    "type": "string",
                    "description": "The URL where the font can be purchased."
                }),
                true,
            )
            .build_value();

        SchemaBuilder::object()
            .property(
                "suggestions",
                SchemaBuilder::array(font)
                    .description("A list of font suggestions.")
                    .build_value(),
                true,
            )
            .build()
    }

    fn schema_name() -> Option<String> {
        Some("suggest_fonts_from_description_output".to_string())
    }
}

impl Instructor for SuggestFontsOutput {}

#[instrument(skip(client, input), fields(description_len = input.description.len()))]
pub async fn suggest_fonts_from_description<C>(
    client: &C,
    input: &SuggestFontsInput,
) -> Result<SuggestFontsOutput>
where
    C: LLMClient,
{
    let output: SuggestFontsOutput = client.materialize(&input.prompt()).await?;
    info!(count = output.suggestions.len(), "Font suggestion finished");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_description() {
        let input = SuggestFontsInput {
            description: "a geometric sans with round dots".to_string(),
        };
        let prompt = input.prompt();
        assert!(prompt.contains("Description: a geometric sans with round dots\n"));
        assert!(!prompt.contains("{description}"));
    }

    #[test]
    fn test_parses_described_fonts() {
        let text = "```json\n{\"suggestions\":[{\"fontName\":\"Gill Sans\",\"confidence\":0.7,\"purchaseUrl\":\"https://x\"}]}\n```";
        let parsed = SuggestFontsOutput::from_model_output(text).unwrap();
        assert_eq!(parsed.suggestions[0].purchase_url, "https://x");
    }
}
