//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET|POST|DELETE /caches[/:name]` - Cache lifecycle
//! - `GET|PUT|DELETE /caches/:name/entries/:key` - Entry access
//! - `POST /caches/:name/entries/:key/get-and-put` - Atomic swap
//! - `DELETE /caches/:name/entries` - Clear a cache
//! - `GET /caches/:name/stats` - Cache statistics

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
