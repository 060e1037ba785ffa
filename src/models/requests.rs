//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, StoreError};

/// Request body for PUT and get-and-put on `/caches/:name/entries/:key`
///
/// # Fields
/// - `value`: The JSON value to store. A missing field and an explicit
///   `null` are both rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct PutRequest {
    /// The value to store
    #[serde(default)]
    pub value: Value,
}

impl PutRequest {
    /// Creates a request carrying `value`
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Returns the value, or `NullValue` if it is JSON null
    pub fn into_value(self) -> Result<Value> {
        if self.value.is_null() {
            return Err(StoreError::NullValue);
        }
        Ok(self.value)
    }
}

/// Validates a key taken from a request path
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StoreError::NullKey);
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(StoreError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
