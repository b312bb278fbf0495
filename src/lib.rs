//! Chat Gate - a response cache and rate limiter in front of a chat model
//!
//! Repeated prompts are answered from a TTL + LRU cache, fresh prompts pass a
//! token-bucket limiter before reaching the upstream, and a memory guard
//! empties the cache when the process grows past a threshold.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod gateway;
pub mod limiter;
pub mod memory;
pub mod models;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{GateError, Result};
pub use gateway::ChatGateway;
pub use tasks::{spawn_cleanup_task, spawn_memory_watch};
