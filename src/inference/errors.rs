//! Inference error types.
//!
//! All errors implement `std::error::Error` via `thiserror`. Structured logging
//! is the caller's responsibility — these types carry the context needed to build
//! meaningful log entries.

use thiserror::Error;

/// Legacy text returned when no message content could be extracted.
pub const EXTRACTION_FAILED_TEXT: &str = "Error: Could not retrieve message content.";

/// Legacy text returned for any transport-level failure.
pub const NETWORK_FAILED_TEXT: &str = "Error: Network error occurred";

/// Errors that can occur during inference operations.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Missing credential or invalid configuration. Always fatal.
    #[error("config error: {reason}")]
    ConfigError {
        reason: String,
    },

    /// A required request input (payload, endpoint, token) was empty.
    #[error("invalid input: {reason}")]
    InvalidInput {
        reason: String,
    },

    /// TCP/HTTP connection to the provider endpoint failed.
    #[error("connection failed to {endpoint}: {reason}")]
    ConnectionFailed {
        endpoint: String,
        reason: String,
    },

    /// The provider did not respond within the configured timeout.
    #[error("inference timeout after {duration_secs}s")]
    Timeout {
        duration_secs: u64,
    },

    /// Non-2xx HTTP response from the provider.
    #[error("HTTP {status}: {body}")]
    HttpError {
        status: u16,
        body: String,
    },

    /// The provider answered, but not in the expected shape.
    #[error("malformed response: {reason}")]
    MalformedResponse {
        reason: String,
    },
}

impl InferenceError {
    /// Whether this is the one error class that must never be hidden.
    pub fn is_config_error(&self) -> bool {
        matches!(self, InferenceError::ConfigError { .. })
    }

    /// Whether the error came from talking to the provider (HTTP or transport).
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            InferenceError::ConnectionFailed { .. }
                | InferenceError::Timeout { .. }
                | InferenceError::HttpError { .. }
        )
    }

    /// Render the error as the flat string older callers expect in place of
    /// a result.
    pub fn legacy_text(&self) -> String {
        match self {
            InferenceError::HttpError { status, body } => format!("Error: {status}, {body}"),
            InferenceError::ConnectionFailed { .. } | InferenceError::Timeout { .. } => {
                NETWORK_FAILED_TEXT.to_string()
            }
            InferenceError::MalformedResponse { .. } => EXTRACTION_FAILED_TEXT.to_string(),
            InferenceError::ConfigError { reason } | InferenceError::InvalidInput { reason } => {
                format!("Error: {reason}")
            }
        }
    }
}

impl From<serde_json::Error> for InferenceError {
    fn from(e: serde_json::Error) -> Self {
        InferenceError::MalformedResponse {
            reason: e.to_string(),
        }
    }
}
