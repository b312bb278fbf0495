//! Request DTOs for the gateway API

use serde::Deserialize;

use crate::cache::Params;

/// Longest accepted message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 5000;

/// Request body for POST /chat
///
/// # Fields
/// - `message`: The prompt to answer
/// - `params`: Optional generation parameters; they take part in the cache key
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub params: Params,
}

impl ChatRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.message.trim().is_empty() {
            return Some("Message cannot be empty".to_string());
        }
        if self.message.chars().count() > MAX_MESSAGE_CHARS {
            return Some(format!(
                "Message exceeds maximum length of {} characters",
                MAX_MESSAGE_CHARS
            ));
        }
        None
    }
}
