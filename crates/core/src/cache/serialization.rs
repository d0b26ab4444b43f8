//! Pure functions for serializing/deserializing resources to/from cache bytes.
//!
//! Cache values are JSON, so they are human-readable when inspecting a live
//! cache. The same encoding is used for single resources and collections,
//! which keeps cache-hit and cache-miss responses byte-identical.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes a resource to JSON bytes.
pub fn serialize_resource<T: Serialize>(resource: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(resource).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a resource.
pub fn deserialize_resource<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

/// Serializes a slice of resources to JSON bytes.
pub fn serialize_resources<T: Serialize>(resources: &[T]) -> Result<Vec<u8>> {
    serde_json::to_vec(resources).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a vector of resources.
pub fn deserialize_resources<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
