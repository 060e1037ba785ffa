//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

use crate::cache::{StoreOptions, DEFAULT_SHARDS};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of index shards per store
    pub shard_count: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Whether stores record hit/miss/put/removal counters
    pub statistics_enabled: bool,
    /// Caches created at startup
    pub default_caches: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SHARD_COUNT` - Index shards per store (default: 16)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STATISTICS_ENABLED` - Record store statistics (default: true)
    /// - `DEFAULT_CACHES` - Comma-separated cache names to create at startup (default: none)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            shard_count: env::var("SHARD_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.shard_count),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            statistics_enabled: env::var("STATISTICS_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.statistics_enabled),
            default_caches: env::var("DEFAULT_CACHES")
                .map(|v| parse_cache_names(&v))
                .unwrap_or(defaults.default_caches),
        }
    }

    /// Returns the per-store options derived from this configuration.
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            shards: self.shard_count,
            statistics: self.statistics_enabled,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shard_count: DEFAULT_SHARDS,
            server_port: 3000,
            statistics_enabled: true,
            default_caches: Vec::new(),
        }
    }
}

fn parse_cache_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.shard_count, 16);
        assert_eq!(config.server_port, 3000);
        assert!(config.statistics_enabled);
        assert!(config.default_caches.is_empty());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("SHARD_COUNT");
        env::remove_var("SERVER_PORT");
        env::remove_var("STATISTICS_ENABLED");
        env::remove_var("DEFAULT_CACHES");

        let config = Config::from_env();
        assert_eq!(config.shard_count, 16);
        assert_eq!(config.server_port, 3000);
        assert!(config.statistics_enabled);
        assert!(config.default_caches.is_empty());
    }

    #[test]
    fn test_parse_cache_names() {
        assert_eq!(
            parse_cache_names(" dates, users ,,"),
            vec!["dates".to_string(), "users".to_string()]
        );
        assert!(parse_cache_names("").is_empty());
    }

    #[test]
    fn test_store_options() {
        let config = Config {
            shard_count: 4,
            statistics_enabled: false,
            ..Config::default()
        };
        assert_eq!(
            config.store_options(),
            StoreOptions {
                shards: 4,
                statistics: false
            }
        );
    }
}
