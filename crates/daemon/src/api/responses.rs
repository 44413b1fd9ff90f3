/// API Response types

use serde::{Deserialize, Serialize};
use whisper_core::Outcome;

/// Result of one inbound event
#[derive(Debug, Serialize, Deserialize)]
pub struct EventResponse {
    pub outcome: Outcome,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}
