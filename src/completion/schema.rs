//! Output schemas for structured completions
//!
//! An [`OutputSchema`] is a named JSON Schema compiled once into a validator.
//! The same schema is sent to the provider as the requested response format
//! and used to validate whatever comes back.

use std::fmt;

use anyhow::{anyhow, Result};
use jsonschema::Validator;
use serde_json::{json, Value};

/// A named, compiled JSON Schema
pub struct OutputSchema {
    name: String,
    schema: Value,
    validator: Validator,
}

impl OutputSchema {
    /// Compile a schema
    ///
    /// Schemas used for structured output must describe an object; anything
    /// else is rejected up front.
    pub fn new(name: impl Into<String>, schema: Value) -> Result<Self> {
        let name = name.into();

        match schema.get("type") {
            Some(Value::String(t)) if t == "object" => {}
            _ => return Err(anyhow!("output schema '{}' must have type 'object'", name)),
        }

        let validator = jsonschema::draft202012::new(&schema)
            .map_err(|e| anyhow!("invalid output schema '{}': {}", name, e))?;

        Ok(Self {
            name,
            schema,
            validator,
        })
    }

    /// Schema name, as sent to the provider
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw JSON Schema document
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Validate an instance, collecting every violation
    pub fn validate(&self, instance: &Value) -> Result<(), Vec<String>> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(instance)
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{}: {}", path, e)
                }
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// OpenAI `response_format` payload requesting strict schema adherence
    pub fn response_format(&self) -> Value {
        json!({
            "type": "json_schema",
            "json_schema": {
                "name": self.name,
                "schema": self.schema,
                "strict": true
            }
        })
    }
}

impl fmt::Debug for OutputSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSchema")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}
