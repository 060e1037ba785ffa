//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::StatsSnapshot;

/// Response body for GET `/caches/:name/entries/:key`
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value, or null if the key is absent
    pub value: Option<Value>,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for operations that return the displaced value
/// (get-and-put and DELETE on an entry)
#[derive(Debug, Clone, Serialize)]
pub struct PreviousValueResponse {
    /// The key operated on
    pub key: String,
    /// The value held before the call, or null if there was none
    pub previous: Option<Value>,
}

impl PreviousValueResponse {
    /// Creates a new PreviousValueResponse
    pub fn new(key: impl Into<String>, previous: Option<Value>) -> Self {
        Self {
            key: key.into(),
            previous,
        }
    }
}

/// Response body for operations that only report success
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Success message
    pub message: String,
}

impl MessageResponse {
    /// Creates a new MessageResponse
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for GET `/caches`
#[derive(Debug, Clone, Serialize)]
pub struct CacheListResponse {
    /// Names of registered caches
    pub caches: Vec<String>,
}

/// Response body for GET `/caches/:name/stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Cache name
    pub cache: String,
    /// Lookups that found an entry
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Values stored
    pub puts: u64,
    /// Entries removed individually
    pub removals: u64,
    /// Current number of entries
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from a store snapshot
    pub fn new(cache: impl Into<String>, stats: StatsSnapshot) -> Self {
        Self {
            cache: cache.into(),
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            puts: stats.puts,
            removals: stats.removals,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for GET `/health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
