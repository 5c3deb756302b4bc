//! Redirect-fragment handler for the `/youtube-callback` route.
//!
//! The provider appends `access_token=..` or `error=..` to the fragment of the
//! redirect URI. The handler records the result through [`TokenLifecycle`] and
//! tells the caller to navigate back to the wizard root.

use std::time::Duration;

use tracing::{info, warn};
use url::form_urlencoded;

use crate::error::AuthResult;
use crate::metrics;
use crate::token::{AccessToken, TokenLifecycle};

/// Route the caller navigates to after processing.
pub const CALLBACK_REDIRECT_TO: &str = "/";

/// Delay before navigating back, so the message can be read.
pub const CALLBACK_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// Stored when the fragment carries neither a token nor an error.
pub const MISSING_RESPONSE_ERROR: &str = "Authentication failed: no token or error in response";

/// Result classification of a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackStatus {
    /// A token was received and stored
    Success,
    /// The provider returned an error code
    ProviderError,
    /// Neither token nor error was present
    InvalidResponse,
}

impl CallbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackStatus::Success => "success",
            CallbackStatus::ProviderError => "error",
            CallbackStatus::InvalidResponse => "invalid",
        }
    }
}

/// What the callback route shows and where it goes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackOutcome {
    pub status: CallbackStatus,
    /// User-facing message
    pub message: String,
    pub redirect_to: &'static str,
    pub redirect_delay: Duration,
}

impl CallbackOutcome {
    fn new(status: CallbackStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            redirect_to: CALLBACK_REDIRECT_TO,
            redirect_delay: CALLBACK_REDIRECT_DELAY,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == CallbackStatus::Success
    }
}

/// Process a redirect fragment.
///
/// Accepts a bare fragment (`access_token=..&expires_in=..`), a fragment with
/// its leading `#`, or a full redirect URL. `error` takes precedence over
/// `access_token` when both are present.
pub fn handle_callback(input: &str, tokens: &TokenLifecycle) -> AuthResult<CallbackOutcome> {
    let params = FragmentParams::parse(extract_fragment(input));

    let outcome = if let Some(code) = params.error {
        warn!(error_code = %code, "OAuth provider returned an error");
        tokens.set_error(format!("OAuth Error: {}", code))?;
        CallbackOutcome::new(
            CallbackStatus::ProviderError,
            format!("Authentication failed: {}", code),
        )
    } else if let Some(value) = params.access_token {
        let mut token = AccessToken::new(value);
        if let Some(seconds) = params.expires_in {
            token = token.expires_in(seconds);
        }
        if let Some(scope) = params.scope {
            token = token.with_scope(scope);
        }
        tokens.set_token(token)?;
        info!(
            has_expiry = params.expires_in.is_some(),
            "OAuth callback stored access token"
        );
        CallbackOutcome::new(
            CallbackStatus::Success,
            "Authentication successful! Redirecting...",
        )
    } else {
        warn!("OAuth callback carried neither token nor error");
        tokens.set_error(MISSING_RESPONSE_ERROR)?;
        CallbackOutcome::new(
            CallbackStatus::InvalidResponse,
            "Authentication failed. Invalid response from Google.",
        )
    };

    metrics::record_callback(outcome.status.as_str());
    Ok(outcome)
}

/// Fields of interest in the redirect fragment.
#[derive(Debug, Default)]
struct FragmentParams {
    access_token: Option<String>,
    error: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
}

impl FragmentParams {
    fn parse(fragment: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(fragment.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "access_token" => params.access_token = Some(value.to_string()),
                "error" => params.error = Some(value.to_string()),
                "expires_in" => params.expires_in = value.parse().ok(),
                "scope" => params.scope = Some(value.to_string()),
                _ => {}
            }
        }
        params
    }
}

/// Take the fragment part of a URL, or the input itself without a leading `#`.
fn extract_fragment(input: &str) -> &str {
    let input = input.trim();
    match input.split_once('#') {
        Some((_, fragment)) => fragment,
        None => input,
    }
}
