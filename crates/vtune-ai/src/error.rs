//! Metadata generation error types.

use thiserror::Error;
use vtune_models::ModelError;

pub type GenerationResult<T> = Result<T, GenerationError>;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Gemini API returned {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Invalid response from Gemini: {0}")]
    InvalidResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ModelError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenerationError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Whether a fresh user-initiated attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationError::RequestFailed { status, .. } => *status == 429 || *status >= 500,
            GenerationError::Http(_) | GenerationError::InvalidResponse(_) | GenerationError::Json(_) => true,
            GenerationError::ConfigError(_) | GenerationError::InvalidInput(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        let quota = GenerationError::RequestFailed {
            status: 429,
            message: "quota".into(),
        };
        assert!(quota.is_retryable());

        let bad_request = GenerationError::RequestFailed {
            status: 400,
            message: "bad".into(),
        };
        assert!(!bad_request.is_retryable());
        assert!(!GenerationError::config_error("no key").is_retryable());
        assert!(GenerationError::invalid_response("empty").is_retryable());
    }
}
