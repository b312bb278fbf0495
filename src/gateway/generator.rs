//! Upstream Generator Module
//!
//! The seam between the gateway and whatever actually produces responses.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::cache::{fingerprint_params, Params};

// == Upstream Error ==
/// Failure reported by a generator. Never cached.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct UpstreamError(pub String);

// == Generator Trait ==
/// Produces a response for a prompt.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generates a response for `prompt` with the given parameters.
    async fn generate(&self, prompt: &str, params: &Params) -> Result<String, UpstreamError>;

    /// Short name used in logs and health output.
    fn name(&self) -> &str {
        "generator"
    }
}

// == Simulated Generator ==
/// Stand-in upstream that answers after a simulated delay.
///
/// Latency is `base_latency` plus a jitter of up to 600 ms derived from the
/// request fingerprint, so the same request always takes the same time.
#[derive(Debug, Clone)]
pub struct SimulatedGenerator {
    base_latency: Duration,
}

impl SimulatedGenerator {
    pub fn new(base_latency: Duration) -> Self {
        Self { base_latency }
    }

    /// Delay the generator will take for this request.
    pub fn latency_for(&self, prompt: &str, params: &Params) -> Duration {
        let digest = fingerprint_params(prompt, params);
        let bytes = digest.as_bytes();
        let jitter_ms = u64::from(u16::from_le_bytes([bytes[0], bytes[1]])) % 600;
        self.base_latency + Duration::from_millis(jitter_ms)
    }
}

#[async_trait]
impl Generator for SimulatedGenerator {
    async fn generate(&self, prompt: &str, params: &Params) -> Result<String, UpstreamError> {
        if prompt.trim().is_empty() {
            return Err(UpstreamError("prompt is empty".to_string()));
        }

        tokio::time::sleep(self.latency_for(prompt, params)).await;
        Ok(format!(
            "You asked: \"{}\". This is a simulated assistant reply.",
            prompt.trim()
        ))
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
