//! Error types for the value cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Store Error Enum ==
/// Unified error type for stores, the cache manager and the HTTP façade.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No copy rule is registered for a configured key or value type
    #[error("No copy rule registered for type {0}")]
    UnsupportedCopyType(&'static str),

    /// The store was closed before the call
    #[error("Store closed: {0}")]
    StoreClosed(String),

    /// A null or empty key was supplied
    #[error("Key must not be null or empty")]
    NullKey,

    /// A null value was supplied where a value is required
    #[error("Value must not be null")]
    NullValue,

    /// No cache is registered under the name
    #[error("Cache not found: {0}")]
    CacheNotFound(String),

    /// A cache is already registered under the name
    #[error("Cache already exists: {0}")]
    CacheAlreadyExists(String),

    /// The cache manager has been closed
    #[error("Cache manager is closed")]
    ManagerClosed,

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = match &self {
            StoreError::CacheNotFound(_) => StatusCode::NOT_FOUND,
            StoreError::CacheAlreadyExists(_) => StatusCode::CONFLICT,
            StoreError::StoreClosed(_) | StoreError::ManagerClosed => StatusCode::GONE,
            StoreError::NullKey | StoreError::NullValue | StoreError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            StoreError::UnsupportedCopyType(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the value cache.
pub type Result<T> = std::result::Result<T, StoreError>;
