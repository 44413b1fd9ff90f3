use thiserror::Error;

/// Error taxonomy shared by every relay component
#[derive(Debug, Error)]
pub enum WhisperError {
    /// Identity, invitation or link lookup miss
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input the user can correct and resubmit
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed link token
    #[error("Decode error: {0}")]
    Decode(String),

    /// Malformed callback payload
    #[error("Invalid callback: {0}")]
    InvalidCallback(String),

    /// Transport or store failure
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for relay operations
pub type Result<T, E = WhisperError> = std::result::Result<T, E>;

impl WhisperError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn invalid_callback(msg: impl Into<String>) -> Self {
        Self::InvalidCallback(msg.into())
    }

    pub fn collaborator(msg: impl Into<String>) -> Self {
        Self::Collaborator(msg.into())
    }

    /// Handled inside the core with a domain message to the user
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Validation(_))
    }

    /// The payload cannot be trusted; the event is dropped without a reply
    pub fn is_untrusted_payload(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::InvalidCallback(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert!(WhisperError::not_found("user").is_recoverable());
        assert!(WhisperError::validation("username").is_recoverable());
        assert!(WhisperError::decode("token").is_untrusted_payload());
        assert!(WhisperError::invalid_callback("x|").is_untrusted_payload());

        let err = WhisperError::collaborator("send failed");
        assert!(!err.is_recoverable());
        assert!(!err.is_untrusted_payload());
        assert_eq!(err.to_string(), "Collaborator error: send failed");
    }
}
