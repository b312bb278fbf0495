//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{extract::State, Json};

use crate::clock::SystemClock;
use crate::config::Config;
use crate::error::{GateError, Result};
use crate::gateway::{ChatGateway, GatewaySnapshot, SimulatedGenerator};
use crate::limiter::LimiterStatus;
use crate::memory::MemoryStatus;
use crate::models::{ChatRequest, ChatResponse, HealthResponse, MaintenanceResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ChatGateway>,
    started_at: Instant,
}

impl AppState {
    /// Creates a new AppState around an assembled gateway.
    pub fn new(gateway: ChatGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
            started_at: Instant::now(),
        }
    }

    /// Creates a new AppState from configuration, backed by the simulated
    /// upstream and the system clock.
    ///
    /// # Errors
    /// `GateError::Config` when a configured limit is unusable.
    pub fn from_config(config: &Config) -> Result<Self> {
        let generator = Arc::new(SimulatedGenerator::new(Duration::from_millis(
            config.upstream_latency_ms,
        )));
        let gateway = ChatGateway::from_config(config, generator, SystemClock::shared())?;
        Ok(Self::new(gateway))
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Handler for POST /chat
///
/// Answers from cache when possible, otherwise calls the upstream if the
/// rate limiter admits it.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(GateError::InvalidRequest(error_msg));
    }

    let reply = state.gateway.respond(&req.message, &req.params).await?;

    Ok(Json(ChatResponse::from(reply)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<GatewaySnapshot> {
    Json(state.gateway.snapshot())
}

/// Handler for GET /rate-limit
pub async fn rate_limit_handler(State(state): State<AppState>) -> Json<LimiterStatus> {
    Json(state.gateway.limiter().status())
}

/// Handler for GET /memory
pub async fn memory_handler(State(state): State<AppState>) -> Json<MemoryStatus> {
    Json(state.gateway.guard().status())
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<MaintenanceResponse> {
    Json(MaintenanceResponse::cleared(state.gateway.clear_cache()))
}

/// Handler for POST /cache/cleanup
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<MaintenanceResponse> {
    Json(MaintenanceResponse::swept(state.gateway.evict_expired()))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.uptime().as_secs()))
}
