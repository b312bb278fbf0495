//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    chat_handler, cleanup_handler, clear_cache_handler, health_handler, memory_handler,
    rate_limit_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /chat` - Answer a message, from cache when possible
/// - `GET /stats` - Gateway, cache, rate limit and memory snapshot
/// - `GET /rate-limit` - Rate limiter status
/// - `GET /memory` - Memory guard status
/// - `DELETE /cache` - Empty the response cache
/// - `POST /cache/cleanup` - Drop expired responses
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(chat_handler))
        .route("/stats", get(stats_handler))
        .route("/rate-limit", get(rate_limit_handler))
        .route("/memory", get(memory_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/cache/cleanup", post(cleanup_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
