//! Value Cache - an in-memory key/value cache with store-by-value semantics
//!
//! Keys and values are copied when they enter a store and values are copied
//! when they leave it, so callers can never mutate stored state through a
//! handle they hold.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::{CacheManager, CopierRegistry, MutableInstant, StoreOptions, ValueStore};
pub use config::Config;
pub use error::{Result, StoreError};
