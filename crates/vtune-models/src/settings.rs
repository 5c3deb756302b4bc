//! User settings persisted alongside wizard state.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Placeholder shipped in example env files; never a usable client id.
pub const CLIENT_ID_PLACEHOLDER: &str = "YOUR_GOOGLE_CLIENT_ID_HERE";

/// Settings that override environment configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub youtube_client_id: String,
    #[serde(default)]
    pub google_ai_api_key: String,
}

impl AppSettings {
    pub fn new(youtube_client_id: impl Into<String>, google_ai_api_key: impl Into<String>) -> Self {
        Self {
            youtube_client_id: youtube_client_id.into(),
            google_ai_api_key: google_ai_api_key.into(),
        }
    }

    /// Copy with surrounding whitespace removed from every value.
    pub fn trimmed(&self) -> Self {
        Self {
            youtube_client_id: self.youtube_client_id.trim().to_string(),
            google_ai_api_key: self.google_ai_api_key.trim().to_string(),
        }
    }

    /// Stored client id, falling back to `fallback` when unset.
    pub fn effective_client_id(&self, fallback: Option<&str>) -> Option<String> {
        non_empty(&self.youtube_client_id)
            .or_else(|| fallback.and_then(non_empty))
            .filter(|id| id != CLIENT_ID_PLACEHOLDER)
    }

    /// Stored AI key, falling back to `fallback` when unset.
    pub fn effective_ai_key(&self, fallback: Option<&str>) -> Option<String> {
        non_empty(&self.google_ai_api_key).or_else(|| fallback.and_then(non_empty))
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
