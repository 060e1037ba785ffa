//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::cache::{CacheManager, CopierRegistry};
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    validate_key, CacheListResponse, GetResponse, HealthResponse, MessageResponse,
    PreviousValueResponse, PutRequest, StatsResponse,
};

/// Cache manager type served over HTTP: string keys, JSON values.
pub type JsonCacheManager = CacheManager<String, Value>;

/// Application state shared across all handlers.
///
/// Stores lock per shard internally, so the manager is shared without an
/// outer lock.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache manager
    pub manager: Arc<JsonCacheManager>,
}

impl AppState {
    /// Creates a new AppState around the given manager.
    pub fn new(manager: JsonCacheManager) -> Self {
        Self {
            manager: Arc::new(manager),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds a manager with the default copy rules and creates every cache
    /// listed in `default_caches`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let manager = CacheManager::new(CopierRegistry::with_defaults(), config.store_options());
        for name in &config.default_caches {
            if manager.get_cache(name).is_none() {
                manager.create_cache(name)?;
                info!("Default cache '{}' created", name);
            }
        }
        Ok(Self::new(manager))
    }
}

/// Handler for GET /caches
pub async fn list_caches_handler(State(state): State<AppState>) -> Json<CacheListResponse> {
    Json(CacheListResponse {
        caches: state.manager.cache_names(),
    })
}

/// Handler for POST /caches/:name
pub async fn create_cache_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    validate_key(&name)?;
    state.manager.create_cache(&name)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!("Cache '{}' created", name))),
    ))
}

/// Handler for DELETE /caches/:name
pub async fn destroy_cache_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.manager.destroy_cache(&name)?;

    Ok(Json(MessageResponse::new(format!("Cache '{}' destroyed", name))))
}

/// Handler for GET /caches/:name/entries/:key
///
/// Responds 404 with a null value when the key is absent.
pub async fn get_entry_handler(
    State(state): State<AppState>,
    Path((name, key)): Path<(String, String)>,
) -> Result<(StatusCode, Json<GetResponse>)> {
    validate_key(&key)?;
    let value = state.manager.cache(&name)?.get(&key)?;

    let status = if value.is_some() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    Ok((status, Json(GetResponse::new(key, value))))
}

/// Handler for PUT /caches/:name/entries/:key
pub async fn put_entry_handler(
    State(state): State<AppState>,
    Path((name, key)): Path<(String, String)>,
    Json(req): Json<PutRequest>,
) -> Result<Json<MessageResponse>> {
    validate_key(&key)?;
    let value = req.into_value()?;
    state.manager.cache(&name)?.put(&key, &value)?;

    Ok(Json(MessageResponse::new(format!("Key '{}' stored", key))))
}

/// Handler for POST /caches/:name/entries/:key/get-and-put
pub async fn get_and_put_handler(
    State(state): State<AppState>,
    Path((name, key)): Path<(String, String)>,
    Json(req): Json<PutRequest>,
) -> Result<Json<PreviousValueResponse>> {
    validate_key(&key)?;
    let value = req.into_value()?;
    let previous = state.manager.cache(&name)?.get_and_put(&key, &value)?;

    Ok(Json(PreviousValueResponse::new(key, previous)))
}

/// Handler for DELETE /caches/:name/entries/:key
pub async fn remove_entry_handler(
    State(state): State<AppState>,
    Path((name, key)): Path<(String, String)>,
) -> Result<Json<PreviousValueResponse>> {
    validate_key(&key)?;
    let previous = state.manager.cache(&name)?.remove(&key)?;

    Ok(Json(PreviousValueResponse::new(key, previous)))
}

/// Handler for DELETE /caches/:name/entries
pub async fn clear_cache_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.manager.cache(&name)?.clear()?;

    Ok(Json(MessageResponse::new(format!("Cache '{}' cleared", name))))
}

/// Handler for GET /caches/:name/stats
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StatsResponse>> {
    let stats = state.manager.cache(&name)?.stats();

    Ok(Json(StatsResponse::new(name, stats)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
