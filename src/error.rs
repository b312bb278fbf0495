//! Error types for the chat gateway
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Gate Error Enum ==
/// Unified error type for the chat gateway.
#[derive(Error, Debug)]
pub enum GateError {
    /// A component was constructed with an unusable setting
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The rate limiter refused the upstream call
    #[error("Rate limited, retry in {retry_after_secs:.1}s")]
    RateLimited {
        /// Seconds until the next token accrues
        retry_after_secs: f64,
    },

    /// The upstream generator failed
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GateError {
    /// Shorthand for a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        GateError::Config(msg.into())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = match &self {
            GateError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GateError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GateError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            GateError::Upstream(_) => StatusCode::BAD_GATEWAY,
            GateError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            GateError::RateLimited { retry_after_secs } => json!({
                "error": self.to_string(),
                "retry_after_secs": retry_after_secs,
            }),
            _ => json!({ "error": self.to_string() }),
        };

        let mut response = (status, Json(body)).into_response();

        // Retry-After carries whole seconds, rounded up so clients never retry early
        if let GateError::RateLimited { retry_after_secs } = self {
            let secs = retry_after_secs.ceil().max(1.0) as u64;
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

// == Result Type Alias ==
/// Convenience Result type for the chat gateway.
pub type Result<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (GateError::config("capacity"), StatusCode::INTERNAL_SERVER_ERROR),
            (GateError::InvalidRequest("bad".to_string()), StatusCode::BAD_REQUEST),
            (
                GateError::RateLimited { retry_after_secs: 2.5 },
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (GateError::Upstream("down".to_string()), StatusCode::BAD_GATEWAY),
            (GateError::Internal("error".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }

    #[test]
    fn test_rate_limited_sets_retry_after_header() {
        let response = GateError::RateLimited { retry_after_secs: 2.2 }.into_response();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok());
        assert_eq!(retry_after, Some("3"));
    }

    #[test]
    fn test_rate_limited_sub_second_rounds_up_to_one() {
        let response = GateError::RateLimited { retry_after_secs: 0.01 }.into_response();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok());
        assert_eq!(retry_after, Some("1"));
    }

    #[tokio::test]
    async fn test_error_body_is_json_with_error_field() {
        let response = GateError::Upstream("timeout".to_string()).into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "Upstream failure: timeout");
    }

    #[tokio::test]
    async fn test_rate_limited_body_carries_retry_hint() {
        let response = GateError::RateLimited { retry_after_secs: 4.0 }.into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["retry_after_secs"], 4.0);
        assert!(json["error"].as_str().unwrap().contains("Rate limited"));
    }
}
