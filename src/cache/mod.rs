//! Cache Module
//!
//! Provides in-memory key/value stores with store-by-value semantics.

mod copy;
mod index;
mod instant;
mod manager;
mod stats;
mod store;


// Re-export public types
pub use copy::{Copier, CopierRegistry, CopyFn};
pub use index::{Closed, ShardedIndex, DEFAULT_SHARDS};
pub use instant::MutableInstant;
pub use manager::CacheManager;
pub use stats::{StatsSnapshot, StoreStats};
pub use store::{StoreOptions, ValueStore};
