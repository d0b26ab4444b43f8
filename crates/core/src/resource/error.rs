use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validation failure for an input payload.
///
/// Carries one message per offending field. Serializes to the wire shape
/// `{"field": ["message", ...]}` so callers can surface errors next to the
/// inputs that caused them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: {}", self.summary())]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// Single-field convenience constructor.
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(field, message)],
        }
    }

    fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Serialize for ValidationError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Group messages by field, preserving field order of first appearance.
        let mut fields: Vec<(&'static str, Vec<&str>)> = Vec::new();
        for error in &self.errors {
            match fields.iter_mut().find(|(f, _)| *f == error.field) {
                Some((_, messages)) => messages.push(error.message.as_str()),
                None => fields.push((error.field, vec![error.message.as_str()])),
            }
        }

        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (field, messages) in fields {
            map.serialize_entry(field, &messages)?;
        }
        map.end()
    }
}
