//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{GateError, Result};

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Values are not validated here; each component rejects unusable settings
/// when it is constructed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cached responses
    pub cache_max_entries: usize,
    /// Lifetime of a cached response in seconds
    pub cache_ttl: u64,
    /// Upstream calls allowed per rate limit period (also the burst size)
    pub rate_limit_requests: u32,
    /// Rate limit period in seconds
    pub rate_limit_period: u64,
    /// Upstream calls allowed per hour, on top of the per-period limit
    pub rate_limit_hour_requests: u32,
    /// Process memory level, in MiB, at which the cache is cleared
    pub memory_threshold_mb: u64,
    /// Memory watch interval in seconds
    pub memory_check_interval: u64,
    /// Expired-entry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Base latency of the simulated upstream in milliseconds
    pub upstream_latency_ms: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cached responses (default: 50)
    /// - `CACHE_TTL` - Response lifetime in seconds (default: 300)
    /// - `RATE_LIMIT_REQUESTS` - Upstream calls per period (default: 15)
    /// - `RATE_LIMIT_PERIOD` - Period in seconds (default: 60)
    /// - `RATE_LIMIT_HOUR_REQUESTS` - Upstream calls per hour (default: 100)
    /// - `MEMORY_THRESHOLD_MB` - Memory threshold in MiB (default: 100)
    /// - `MEMORY_CHECK_INTERVAL` - Memory watch frequency in seconds (default: 10)
    /// - `CLEANUP_INTERVAL` - Expired sweep frequency in seconds (default: 30)
    /// - `UPSTREAM_LATENCY_MS` - Simulated upstream latency (default: 200)
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            cache_ttl: env_or("CACHE_TTL", defaults.cache_ttl),
            rate_limit_requests: env_or("RATE_LIMIT_REQUESTS", defaults.rate_limit_requests),
            rate_limit_period: env_or("RATE_LIMIT_PERIOD", defaults.rate_limit_period),
            rate_limit_hour_requests: env_or(
                "RATE_LIMIT_HOUR_REQUESTS",
                defaults.rate_limit_hour_requests,
            ),
            memory_threshold_mb: env_or("MEMORY_THRESHOLD_MB", defaults.memory_threshold_mb),
            memory_check_interval: env_or("MEMORY_CHECK_INTERVAL", defaults.memory_check_interval),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            upstream_latency_ms: env_or("UPSTREAM_LATENCY_MS", defaults.upstream_latency_ms),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    /// Time between expired-entry sweeps.
    ///
    /// # Errors
    /// `GateError::Config` when `cleanup_interval` is zero.
    pub fn cleanup_period(&self) -> Result<Duration> {
        whole_seconds("cleanup interval", self.cleanup_interval)
    }

    /// Time between memory checks.
    ///
    /// # Errors
    /// `GateError::Config` when `memory_check_interval` is zero.
    pub fn memory_check_period(&self) -> Result<Duration> {
        whole_seconds("memory check interval", self.memory_check_interval)
    }
}

fn whole_seconds(name: &str, secs: u64) -> Result<Duration> {
    if secs == 0 {
        return Err(GateError::config(format!("{name} must be at least 1 second")));
    }
    Ok(Duration::from_secs(secs))
}

/// Parses `key` from the environment, falling back to `default` when the
/// variable is missing or unparsable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_max_entries: 50,
            cache_ttl: 300,
            rate_limit_requests: 15,
            rate_limit_period: 60,
            rate_limit_hour_requests: 100,
            memory_threshold_mb: 100,
            memory_check_interval: 10,
            cleanup_interval: 30,
            upstream_latency_ms: 200,
            server_port: 8000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_max_entries, 50);
        assert_eq!(config.cache_ttl, 300);
        assert_eq!(config.rate_limit_requests, 15);
        assert_eq!(config.rate_limit_period, 60);
        assert_eq!(config.rate_limit_hour_requests, 100);
        assert_eq!(config.memory_threshold_mb, 100);
        assert_eq!(config.server_port, 8000);
    }

    #[test]
    fn test_env_or_falls_back_on_missing_and_garbage() {
        env::remove_var("CHAT_GATE_TEST_MISSING");
        assert_eq!(env_or("CHAT_GATE_TEST_MISSING", 7u32), 7);

        env::set_var("CHAT_GATE_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_or("CHAT_GATE_TEST_GARBAGE", 7u32), 7);
        env::remove_var("CHAT_GATE_TEST_GARBAGE");
    }

    #[test]
    fn test_env_or_parses_value() {
        env::set_var("CHAT_GATE_TEST_VALUE", " 42 ");
        assert_eq!(env_or("CHAT_GATE_TEST_VALUE", 7u64), 42);
        env::remove_var("CHAT_GATE_TEST_VALUE");
    }

    #[test]
    fn test_intervals_reject_zero() {
        let config = Config {
            cleanup_interval: 0,
            memory_check_interval: 0,
            ..Config::default()
        };

        assert!(matches!(config.cleanup_period(), Err(GateError::Config(_))));
        assert!(matches!(config.memory_check_period(), Err(GateError::Config(_))));
    }

    #[test]
    fn test_intervals_default() {
        let config = Config::default();

        assert_eq!(config.cleanup_period().unwrap(), Duration::from_secs(30));
        assert_eq!(config.memory_check_period().unwrap(), Duration::from_secs(10));
    }
}
