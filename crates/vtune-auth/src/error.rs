//! Auth error types.

use thiserror::Error;
use vtune_storage::StorageError;

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("OAuth is not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid redirect URI: {0}")]
    InvalidRedirect(String),

    #[error("Credential storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    pub fn not_configured(msg: impl Into<String>) -> Self {
        Self::NotConfigured(msg.into())
    }

    pub fn invalid_redirect(msg: impl Into<String>) -> Self {
        Self::InvalidRedirect(msg.into())
    }
}
