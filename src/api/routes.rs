//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_cache_handler, create_cache_handler, destroy_cache_handler, get_and_put_handler,
    get_entry_handler, health_handler, list_caches_handler, put_entry_handler,
    remove_entry_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /caches` - List cache names
/// - `POST /caches/:name` - Create a cache
/// - `DELETE /caches/:name` - Destroy a cache
/// - `GET /caches/:name/entries/:key` - Retrieve a value
/// - `PUT /caches/:name/entries/:key` - Store a value
/// - `POST /caches/:name/entries/:key/get-and-put` - Store a value, return the previous one
/// - `DELETE /caches/:name/entries/:key` - Remove a value, return it
/// - `DELETE /caches/:name/entries` - Remove every entry
/// - `GET /caches/:name/stats` - Cache statistics
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/caches", get(list_caches_handler))
        .route(
            "/caches/:name",
            post(create_cache_handler).delete(destroy_cache_handler),
        )
        .route("/caches/:name/entries", delete(clear_cache_handler))
        .route(
            "/caches/:name/entries/:key",
            get(get_entry_handler)
                .put(put_entry_handler)
                .delete(remove_entry_handler),
        )
        .route(
            "/caches/:name/entries/:key/get-and-put",
            post(get_and_put_handler),
        )
        .route("/caches/:name/stats", get(stats_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheManager, CopierRegistry, StoreOptions};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let manager = CacheManager::new(CopierRegistry::with_defaults(), StoreOptions::default());
        manager.create_cache("test").unwrap();
        create_router(AppState::new(manager))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/caches/test/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_put_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/caches/test/entries/k")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"value":"hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/caches/test/entries/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_cache_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/caches/missing/entries/k")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
