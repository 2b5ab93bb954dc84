//! The todo record managed by the service.
//!
//! # Design
//! Only `id` is typed. Every other field (`title`, `completed`, ...) is kept
//! as free-form JSON in `fields` and flattened on the wire, so a record
//! serializes as `{"id": "1", "title": "buy milk"}` and the service never
//! enforces a schema beyond the id.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// A single todo record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Todo {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Todo {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Build a record from an arbitrary JSON value.
    ///
    /// The value must be an object carrying a string `id`.
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        let Value::Object(mut fields) = value else {
            return Err(ApiError::MalformedBody("expected a JSON object".to_string()));
        };
        match fields.remove("id") {
            Some(Value::String(id)) => Ok(Self { id, fields }),
            Some(_) => Err(ApiError::MalformedBody("`id` must be a string".to_string())),
            None => Err(ApiError::MalformedBody("missing `id`".to_string())),
        }
    }

    /// Merge a partial update into this record. An `id` key in the patch is
    /// ignored.
    pub fn merge(&mut self, patch: Map<String, Value>) {
        for (key, value) in patch {
            if key == "id" {
                continue;
            }
            self.fields.insert(key, value);
        }
    }
}
