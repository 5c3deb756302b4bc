//! Upload error types.

use thiserror::Error;

pub type UploadResult<T> = Result<T, UploadError>;

#[derive(Debug, Error)]
pub enum UploadError {
    /// The bearer token was rejected (HTTP 401)
    #[error("Upload unauthorized: {0}")]
    Unauthorized(String),

    #[error("Upload failed ({status}): {message}")]
    Failed { status: u16, message: String },

    #[error("Invalid response from YouTube: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UploadError {
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Map a non-success HTTP status to an error.
    pub fn from_http_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status == 401 {
            Self::Unauthorized(message)
        } else {
            Self::Failed { status, message }
        }
    }

    /// Check if the stored token must be discarded.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, UploadError::Unauthorized(_))
    }

    /// Check if the same upload may be retried with the same token.
    pub fn is_retryable(&self) -> bool {
        match self {
            UploadError::Failed { status, .. } => *status == 429 || *status >= 500,
            UploadError::Http(_) => true,
            _ => false,
        }
    }
}
