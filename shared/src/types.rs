//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Generic message shown when the backend cannot be reached or answers garbage
pub const NETWORK_ERROR_MESSAGE: &str = "Error de red o del servidor";

/// Structured failure returned instead of raising: `{error: true, message}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorPayload {
    pub error: bool,
    pub message: String,
}

impl ErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
        }
    }

    pub fn network() -> Self {
        Self::new(NETWORK_ERROR_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_payload_shape() {
        let json = serde_json::to_value(ErrorPayload::new("RUT duplicado")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": true, "message": "RUT duplicado"})
        );
    }
}
