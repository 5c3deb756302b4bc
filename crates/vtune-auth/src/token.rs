//! Bearer credential lifecycle.
//!
//! The token and the error slot live in the shared state store so that the
//! callback route (which runs in a different session) can hand them to the
//! wizard. Writes keep the two slots mutually exclusive: the slot being
//! cleared is removed before the other one is written.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vtune_storage::{JsonStateExt, SharedStore, StateStore};

use crate::error::AuthResult;

/// Store key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "youtube_access_token";

/// Store key for the one-shot authentication error.
pub const AUTH_ERROR_KEY: &str = "youtube_auth_error";

/// Tokens this close to expiry are treated as expired.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// Bearer token received from the OAuth provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    #[serde(rename = "accessToken")]
    value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
}

impl AccessToken {
    /// Token with unknown expiry.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_at: None,
            scope: None,
        }
    }

    /// Set the expiry relative to now.
    ///
    /// A lifetime that does not fit a timestamp leaves the expiry unknown.
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.expires_at =
            Duration::try_seconds(seconds).and_then(|lifetime| Utc::now().checked_add_signed(lifetime));
        if self.expires_at.is_none() {
            warn!(expires_in = seconds, "Token lifetime out of range, storing without expiry");
        }
        self
    }

    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// The bearer string. Never log this.
    pub fn secret(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Check expiry (with margin) at a given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now + Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS) >= expires_at,
            None => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Token/error pair as seen by the publish step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialState {
    pub access_token: Option<AccessToken>,
    pub auth_error: Option<String>,
}

/// Owner of the credential slots in the shared store.
#[derive(Clone)]
pub struct TokenLifecycle {
    store: SharedStore,
}

impl TokenLifecycle {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Store a freshly received token and clear any stored error.
    pub fn set_token(&self, token: AccessToken) -> AuthResult<()> {
        self.store.delete(AUTH_ERROR_KEY)?;
        self.store.save_json(ACCESS_TOKEN_KEY, &token)?;
        debug!(has_expiry = token.expires_at.is_some(), "Stored access token");
        Ok(())
    }

    /// Store an authentication error and clear any stored token.
    pub fn set_error(&self, message: impl Into<String>) -> AuthResult<()> {
        let message = message.into();
        self.store.delete(ACCESS_TOKEN_KEY)?;
        self.store.save_json(AUTH_ERROR_KEY, &message)?;
        debug!("Stored authentication error");
        Ok(())
    }

    /// Read the current token and error.
    ///
    /// The token stays stored. The error is removed as it is read, so it is
    /// surfaced at most once.
    pub fn read_and_keep(&self) -> CredentialState {
        let auth_error: Option<String> = self.store.take_json(AUTH_ERROR_KEY);
        let access_token = self.access_token();

        if auth_error.is_some() && access_token.is_some() {
            warn!("Found both a token and an auth error; discarding the token");
            if let Err(e) = self.store.delete(ACCESS_TOKEN_KEY) {
                warn!("Failed to discard token: {}", e);
            }
            return CredentialState {
                access_token: None,
                auth_error,
            };
        }

        CredentialState {
            access_token,
            auth_error,
        }
    }

    /// The stored token, if present and not expired.
    ///
    /// An expired token is deleted as it is read.
    pub fn access_token(&self) -> Option<AccessToken> {
        let token: AccessToken = self.store.load_json(ACCESS_TOKEN_KEY)?;
        if token.is_expired() {
            debug!(expires_at = ?token.expires_at, "Stored access token expired");
            if let Err(e) = self.store.delete(ACCESS_TOKEN_KEY) {
                warn!("Failed to delete expired token: {}", e);
            }
            return None;
        }
        Some(token)
    }

    pub fn has_valid_token(&self) -> bool {
        self.access_token().is_some()
    }

    /// Remove the token only.
    pub fn clear_token(&self) -> AuthResult<()> {
        self.store.delete(ACCESS_TOKEN_KEY)?;
        debug!("Cleared access token");
        Ok(())
    }

    /// Remove both token and error.
    pub fn clear_all(&self) -> AuthResult<()> {
        self.store.delete(ACCESS_TOKEN_KEY)?;
        self.store.delete(AUTH_ERROR_KEY)?;
        debug!("Cleared credentials");
        Ok(())
    }
}
