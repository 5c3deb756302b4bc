//! OAuth configuration and authorize URL construction.

use url::Url;
use vtune_models::CLIENT_ID_PLACEHOLDER;

use crate::error::{AuthError, AuthResult};

/// Google authorization endpoint.
pub const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Fixed callback route the provider redirects back to.
pub const CALLBACK_PATH: &str = "/youtube-callback";

/// The only scope requested: video upload.
pub const YOUTUBE_UPLOAD_SCOPE: &str = "https://www.googleapis.com/auth/youtube.upload";

/// Default origin the callback route is served from.
pub const DEFAULT_REDIRECT_ORIGIN: &str = "http://localhost:9002";

/// OAuth client configuration.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// OAuth client id; `None` when not configured
    pub client_id: Option<String>,
    /// Origin (scheme, host, port) hosting the callback route
    pub redirect_origin: String,
    /// Authorization endpoint
    pub authorize_endpoint: String,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            redirect_origin: DEFAULT_REDIRECT_ORIGIN.to_string(),
            authorize_endpoint: AUTHORIZE_ENDPOINT.to_string(),
        }
    }
}

impl OAuthConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            client_id: std::env::var("YOUTUBE_CLIENT_ID").ok(),
            redirect_origin: std::env::var("OAUTH_REDIRECT_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_REDIRECT_ORIGIN.to_string()),
            authorize_endpoint: AUTHORIZE_ENDPOINT.to_string(),
        }
    }

    pub fn with_client_id(mut self, client_id: Option<String>) -> Self {
        self.client_id = client_id;
        self
    }

    /// Usable client id, ignoring blanks and the shipped placeholder.
    pub fn effective_client_id(&self) -> Option<&str> {
        self.client_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty() && *id != CLIENT_ID_PLACEHOLDER)
    }

    /// Full redirect URI: origin plus the fixed callback path.
    pub fn redirect_uri(&self) -> AuthResult<Url> {
        let origin = Url::parse(&self.redirect_origin)
            .map_err(|e| AuthError::invalid_redirect(format!("{}: {}", self.redirect_origin, e)))?;
        origin
            .join(CALLBACK_PATH)
            .map_err(|e| AuthError::invalid_redirect(e.to_string()))
    }

    /// Build the implicit-grant authorize URL for the upload scope.
    pub fn authorize_url(&self) -> AuthResult<Url> {
        let client_id = self.effective_client_id().ok_or_else(|| {
            AuthError::not_configured(
                "YouTube client id is missing; set YOUTUBE_CLIENT_ID or save it in settings",
            )
        })?;
        let redirect_uri = self.redirect_uri()?;

        let mut url = Url::parse(&self.authorize_endpoint).map_err(|e| {
            AuthError::not_configured(format!("invalid authorize endpoint: {}", e))
        })?;
        url.query_pairs_mut()
            .append_pair("client_id", client_id)
            .append_pair("redirect_uri", redirect_uri.as_str())
            .append_pair("response_type", "token")
            .append_pair("scope", YOUTUBE_UPLOAD_SCOPE)
            .append_pair("include_granted_scopes", "true");

        Ok(url)
    }
}
