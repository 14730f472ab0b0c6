mod builder;
pub use builder::SchemaBuilder;

use serde_json::Value;

use crate::error::{FontSnapError, Result};

/// Schema is a representation of a JSON Schema that describes the structure
/// the model should return.
#[derive(Debug, Clone)]
pub struct Schema {
    pub schema: Value,
}

impl Schema {
    pub fn new(schema: Value) -> Self {
        Self { schema }
    }

    pub fn to_json(&self) -> &Value {
        &self.schema
    }

    /// Create a schema builder for an object type
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::object()
    }

    /// Check a JSON value against this schema.
    ///
    /// At most three violations are reported, each with the JSON pointer
    /// of the offending instance.
    pub fn validate(&self, instance: &Value) -> Result<()> {
        if !self.schema.is_object() {
            return Ok(());
        }

        let compiled = jsonschema::validator_for(&self.schema)
            .map_err(|e| FontSnapError::SchemaError(format!("Invalid JSON Schema: {}", e)))?;

        if compiled.validate(instance).is_err() {
            let msgs: Vec<String> = compiled
                .iter_errors(instance)
                .take(3)
                .map(|err| format!("{} at '{}'", err, err.instance_path))
                .collect();
            return Err(FontSnapError::ValidationError(msgs.join("; ")));
        }

        Ok(())
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.schema)
    }
}

/// SchemaType trait defines a type that can be converted to a JSON Schema
pub trait SchemaType {
    /// Generate a JSON Schema representation of this type
    fn schema() -> Schema;

    /// Optional name for the schema
    fn schema_name() -> Option<String> {
        None
    }
}
