//! Error types for agent provisioning

use thiserror::Error;

use crate::config::validator::ValidationError;

/// Errors that can occur while provisioning an agent
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Credential missing, empty, or rejected by the platform
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Request rejected locally or by the platform's schema checks
    #[error("Validation error: {0}")]
    Validation(String),

    /// Connection failure or timeout
    #[error("Transport error: {0}")]
    Transport(String),

    /// Account quota exceeded
    #[error("Rate limited{}", retry_hint(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },

    /// Any other non-success response
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body could not be understood
    #[error("Parse error: {0}")]
    Parse(String),

    /// Local configuration problem (settings, templates, secrets)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

fn retry_hint(retry_after_secs: &Option<u64>) -> String {
    match retry_after_secs {
        Some(secs) => format!(": retry after {}s", secs),
        None => String::new(),
    }
}

impl ProvisionError {
    /// Collapse a list of validation failures into one error
    pub fn from_validation(errors: &[ValidationError]) -> Self {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        ProvisionError::Validation(messages.join("; "))
    }

    /// Map a non-success HTTP status to the error taxonomy
    pub fn from_status(status: u16, message: String, retry_after_secs: Option<u64>) -> Self {
        match status {
            401 | 403 => ProvisionError::Authentication(if message.is_empty() {
                "credential rejected by platform".to_string()
            } else {
                message
            }),
            400 | 422 => ProvisionError::Validation(message),
            429 => ProvisionError::RateLimited { retry_after_secs },
            _ => ProvisionError::Api { status, message },
        }
    }
}

impl From<reqwest::Error> for ProvisionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProvisionError::Transport(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            ProvisionError::Transport(format!("Connection error: {}", err))
        } else if err.is_decode() {
            ProvisionError::Parse(err.to_string())
        } else {
            ProvisionError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProvisionError {
    fn from(err: serde_json::Error) -> Self {
        ProvisionError::Parse(err.to_string())
    }
}

/// Result type alias for provisioning operations
pub type ProvisionResult<T> = Result<T, ProvisionError>;
