//! Wizard error types.

use thiserror::Error;
use vtune_ai::GenerationError;
use vtune_auth::AuthError;
use vtune_models::{ModelError, Step};
use vtune_storage::StorageError;
use vtune_youtube::UploadError;

pub type WizardResult<T> = Result<T, WizardError>;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Step {step} cannot be committed before step {missing} is complete")]
    OutOfOrder { step: Step, missing: Step },

    #[error("Step {0} is not available yet")]
    StepLocked(Step),

    #[error("Illegal transition: {0}")]
    IllegalTransition(String),

    #[error("Please re-select the video file \"{file_name}\" to continue")]
    VideoReacquisitionRequired { file_name: String },

    #[error("Not authenticated with YouTube")]
    NotAuthenticated,

    #[error("AI metadata generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Upload failed: {0}")]
    Upload(#[from] UploadError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<ModelError> for WizardError {
    fn from(err: ModelError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl WizardError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn illegal_transition(msg: impl Into<String>) -> Self {
        Self::IllegalTransition(msg.into())
    }

    /// Check if the user has to authenticate (again) before publishing.
    pub fn requires_reauth(&self) -> bool {
        match self {
            WizardError::NotAuthenticated => true,
            WizardError::Upload(e) => e.is_unauthorized(),
            _ => false,
        }
    }

    /// Check if a fresh user-initiated attempt of the same action may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            WizardError::Generation(e) => e.is_retryable(),
            WizardError::Upload(e) => e.is_retryable(),
            _ => false,
        }
    }
}
