//! Request and Response models for the gateway API
//!
//! DTOs used for serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

pub use requests::{ChatRequest, MAX_MESSAGE_CHARS};
pub use responses::{ChatResponse, HealthResponse, MaintenanceResponse};
