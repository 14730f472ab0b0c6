use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{FontSnapError, Result};
use crate::schema::SchemaType;

/// The `Instructor` trait combines JSON schema generation, deserialization and validation.
///
/// Types returned by a model implement it so the raw JSON answer can be
/// checked against the declared schema and turned into a typed value in one
/// step. The default `validate` accepts anything that deserialized; override
/// it for checks the schema cannot express.
///
/// ```
/// use fontsnap::{FontSnapError, Instructor, Schema, SchemaBuilder, SchemaType};
/// use serde::{Deserialize, Serialize};
/// use serde_json::json;
///
/// #[derive(Serialize, Deserialize, Debug)]
/// struct Specimen {
///     family: String,
/// }
///
/// impl SchemaType for Specimen {
///     fn schema() -> Schema {
///         SchemaBuilder::object()
///             .property("family", json!({ "type": "string" }), true)
///             .build()
///     }
/// }
///
/// impl Instructor for Specimen {
///     fn validate(&self) -> fontsnap::Result<()> {
///         if self.family.trim().is_empty() {
///             return Err(FontSnapError::ValidationError("family cannot be empty".into()));
///         }
///         Ok(())
///     }
/// }
///
/// let ok = Specimen::from_model_output(r#"{"family": "Lato"}"#).unwrap();
/// assert_eq!(ok.family, "Lato");
/// assert!(Specimen::from_model_output(r#"{"family": " "}"#).is_err());
/// ```
pub trait Instructor: SchemaType + DeserializeOwned + Serialize {
    /// Optional validation logic beyond type checking
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Parse raw model text: JSON-decode, check against [`SchemaType::schema`],
    /// deserialize, then run [`Instructor::validate`].
    fn from_model_output(text: &str) -> Result<Self>
    where
        Self: Sized,
    {
        let json_content = extract_json_from_markdown(text);
        let value: Value = serde_json::from_str(&json_content).map_err(|e| {
            FontSnapError::ValidationError(format!(
                "Failed to parse response: {}\nPartial JSON: {}",
                e, json_content
            ))
        })?;

        Self::schema().validate(&value)?;

        let parsed: Self = serde_json::from_value(value).map_err(|e| {
            FontSnapError::ValidationError(format!("Response does not match schema: {}", e))
        })?;
        parsed.validate()?;
        Ok(parsed)
    }
}

/// Extract JSON from markdown code blocks if present, otherwise return the content as-is.
///
/// Models occasionally wrap JSON answers in ```json ... ``` fences even when
/// asked for a JSON response type.
pub fn extract_json_from_markdown(content: &str) -> String {
    let trimmed = content.trim();

    if trimmed.starts_with("```") {
        if let Some(start_idx) = trimmed.find('\n') {
            let after_start = &trimmed[start_idx + 1..];
            if let Some(end_idx) = after_start.rfind("```") {
                return after_start[..end_idx].trim().to_string();
            }
        }
    }

    trimmed.to_string()
}
