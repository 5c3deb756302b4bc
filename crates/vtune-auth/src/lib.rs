//! OAuth token lifecycle and redirect callback handling.
//!
//! This crate provides:
//! - `TokenLifecycle`: the bearer credential and the one-shot error slot,
//!   kept in the shared state store so they survive the redirect
//! - `handle_callback`: the redirect-fragment handler
//! - `OAuthConfig`: authorize URL construction for the upload scope

pub mod callback;
pub mod config;
pub mod error;
pub mod metrics;
pub mod token;

pub use callback::{handle_callback, CallbackOutcome, CallbackStatus};
pub use config::{OAuthConfig, AUTHORIZE_ENDPOINT, CALLBACK_PATH, YOUTUBE_UPLOAD_SCOPE};
pub use error::{AuthError, AuthResult};
pub use token::{AccessToken, CredentialState, TokenLifecycle};
