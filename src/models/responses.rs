//! Response DTOs for the gateway API

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::gateway::{ChatReply, ReplySource};

/// Response body for POST /chat
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response: String,
    /// Either "cache" or "upstream"
    pub source: ReplySource,
    /// Hex cache key of the request
    pub fingerprint: String,
    /// Time spent answering, in milliseconds
    pub response_time_ms: f64,
    /// When the response was produced (the original time for cache hits)
    pub timestamp: DateTime<Utc>,
}

impl From<ChatReply> for ChatResponse {
    fn from(reply: ChatReply) -> Self {
        Self {
            response: reply.response,
            source: reply.source,
            fingerprint: reply.fingerprint.to_string(),
            response_time_ms: reply.elapsed.as_secs_f64() * 1000.0,
            timestamp: reply.cached_at,
        }
    }
}

/// Response body for cache maintenance (DELETE /cache, POST /cache/cleanup)
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceResponse {
    pub message: String,
    pub entries_removed: usize,
}

impl MaintenanceResponse {
    pub fn cleared(entries_removed: usize) -> Self {
        Self {
            message: format!("Cache cleared, {} entries removed", entries_removed),
            entries_removed,
        }
    }

    pub fn swept(entries_removed: usize) -> Self {
        Self {
            message: format!("{} expired entries removed", entries_removed),
            entries_removed,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Seconds since the server started
    pub uptime_seconds: u64,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(uptime_seconds: u64) -> Self {
        Self {
            status: "healthy".to_string(),
            uptime_seconds,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
