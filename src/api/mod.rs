//! API Module
//!
//! HTTP handlers and routing for the gateway REST API. The gateway core knows
//! nothing about HTTP; this layer maps requests onto it and its errors onto
//! status codes.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
