//! The book record.
//!
//! A book is an open JSON object: a system-assigned `id` plus whatever fields
//! the client sent. `title` and `author` are the only fields with meaning;
//! everything else is stored verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Fields every new book must carry.
pub const REQUIRED_FIELDS: [&str; 2] = ["title", "author"];

/// One stored book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    id: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Book {
    /// Build a book from a generated id and a client payload.
    ///
    /// Any `id` inside the payload is discarded.
    pub fn new(id: impl Into<String>, mut payload: Map<String, Value>) -> Self {
        payload.remove("id");
        Self {
            id: id.into(),
            fields: payload,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(Value::as_str)
    }

    pub fn author(&self) -> Option<&str> {
        self.get("author").and_then(Value::as_str)
    }

    /// Get any non-id field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// All fields except `id`.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Shallow-merge `patch` over this book. Patch wins on conflict; `id` is
    /// never overwritten.
    pub fn merge(&mut self, patch: Map<String, Value>) {
        for (key, value) in patch {
            if key == "id" {
                continue;
            }
            self.fields.insert(key, value);
        }
    }
}

/// Check a create payload and return it as a map.
pub fn validate_new(body: Value) -> Result<Map<String, Value>, ApiError> {
    let map = into_object(body)?;
    for field in REQUIRED_FIELDS {
        match map.get(field) {
            Some(Value::String(s)) if !s.trim().is_empty() => {}
            Some(Value::String(_)) => {
                return Err(ApiError::Validation(format!("'{field}' must not be empty")))
            }
            Some(_) => return Err(ApiError::Validation(format!("'{field}' must be a string"))),
            None => return Err(ApiError::Validation(format!("missing field '{field}'"))),
        }
    }
    Ok(map)
}

/// Check an update payload. Known fields, when present, must be strings.
pub fn validate_patch(body: Value) -> Result<Map<String, Value>, ApiError> {
    let map = into_object(body)?;
    for field in REQUIRED_FIELDS {
        if let Some(value) = map.get(field) {
            if !value.is_string() {
                return Err(ApiError::Validation(format!("'{field}' must be a string")));
            }
        }
    }
    Ok(map)
}

fn into_object(body: Value) -> Result<Map<String, Value>, ApiError> {
    match body {
        Value::Object(map) => Ok(map),
        other => Err(ApiError::Validation(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
