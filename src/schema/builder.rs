use serde_json::{Value, json};
use std::collections::{BTreeMap, BTreeSet};

use super::Schema;

/// SchemaBuilder helps construct JSON Schema incrementally.
///
/// Properties and required names are kept sorted so the emitted schema is
/// stable from one request to the next.
#[derive(Default)]
pub struct SchemaBuilder {
    schema_type: String,
    description: Option<String>,
    properties: BTreeMap<String, Value>,
    required: BTreeSet<String>,
    items: Option<Value>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            schema_type: "object".to_string(),
            ..Default::default()
        }
    }

    pub fn object() -> Self {
        Self::new()
    }

    pub fn array(items: Value) -> Self {
        Self {
            schema_type: "array".to_string(),
            items: Some(items),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn property(
        mut self,
        name: impl Into<String>,
        property_schema: Value,
        required: bool,
    ) -> Self {
        let name = name.into();
        self.properties.insert(name.clone(), property_schema);
        if required {
            self.required.insert(name);
        }
        self
    }

    /// Finish the builder and return the raw JSON value, for nesting.
    pub fn build_value(self) -> Value {
        let mut schema = json!({
            "type": self.schema_type
        });

        if let Some(description) = self.description {
            schema["description"] = json!(description);
        }

        if self.schema_type == "object" && !self.properties.is_empty() {
            schema["properties"] = json!(self.properties);
            if !self.required.is_empty() {
                schema["required"] = json!(self.required);
            }
        }

        if let Some(items) = self.items {
            schema["items"] = items;
        }

        schema
    }

    pub fn build(self) -> Schema {
        Schema::new(self.build_value())
    }
}
