//! Gateway Module
//!
//! The coordinator that answers chat requests and the upstream generator seam.

mod coordinator;
mod generator;
mod stats;

pub use coordinator::{
    CachedResponse, ChatGateway, ChatReply, GatewaySnapshot, ReplySource, ResponseCache,
};
pub use generator::{Generator, SimulatedGenerator, UpstreamError};
pub use stats::{GatewayCounters, GatewayStats};
