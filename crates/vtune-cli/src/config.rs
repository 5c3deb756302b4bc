//! CLI configuration and persisted user settings.

use std::path::PathBuf;

use vtune_ai::GeminiConfig;
use vtune_auth::OAuthConfig;
use vtune_models::AppSettings;
use vtune_storage::{JsonStateExt, StateStore, StorageResult};
use vtune_youtube::YouTubeConfig;

/// Store key of the user settings.
pub const SETTINGS_KEY: &str = "vidtune_app_settings";

/// Default location of the state file.
pub const DEFAULT_STATE_FILE: &str = ".vidtune/state.json";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// JSON file backing the state store
    pub state_file: PathBuf,
    /// Emit JSON logs
    pub json_logs: bool,
    pub oauth: OAuthConfig,
    pub gemini: GeminiConfig,
    pub youtube: YouTubeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            json_logs: false,
            oauth: OAuthConfig::default(),
            gemini: GeminiConfig::default(),
            youtube: YouTubeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            state_file: std::env::var("VIDTUNE_STATE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_FILE)),
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
            oauth: OAuthConfig::from_env(),
            gemini: GeminiConfig::from_env(),
            youtube: YouTubeConfig::from_env(),
        }
    }

    /// Overlay stored settings; non-empty stored values win over the environment.
    pub fn with_settings(mut self, settings: &AppSettings) -> Self {
        let client_id = settings.effective_client_id(self.oauth.client_id.as_deref());
        let api_key = settings.effective_ai_key(self.gemini.api_key.as_deref());
        self.oauth = self.oauth.with_client_id(client_id);
        self.gemini = self.gemini.with_api_key(api_key);
        self
    }
}

/// Load stored settings; missing or corrupt settings are the defaults.
pub fn load_settings<S: StateStore + ?Sized>(store: &S) -> AppSettings {
    store.load_json(SETTINGS_KEY).unwrap_or_default()
}

/// Persist settings with surrounding whitespace removed.
pub fn save_settings<S: StateStore + ?Sized>(store: &S, settings: &AppSettings) -> StorageResult<AppSettings> {
    let settings = settings.trimmed();
    store.save_json(SETTINGS_KEY, &settings)?;
    Ok(settings)
}

/// Replace the given values of the stored settings and persist the result.
pub fn update_settings<S: StateStore + ?Sized>(
    store: &S,
    client_id: Option<String>,
    api_key: Option<String>,
) -> StorageResult<AppSettings> {
    let mut settings = load_settings(store);
    if let Some(client_id) = client_id {
        settings.youtube_client_id = client_id;
    }
    if let Some(api_key) = api_key {
        settings.google_ai_api_key = api_key;
    }
    save_settings(store, &settings)
}

/// Show only the last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.is_empty() {
        return "(not set)".to_string();
    }
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use vtune_models::CLIENT_ID_PLACEHOLDER;
    use vtune_storage::MemoryStore;

    use super::*;

    fn env_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.oauth.client_id = Some("env-client".into());
        config.gemini.api_key = Some("env-key".into());
        config
    }

    #[test]
    fn test_stored_settings_override_env() {
        let config = env_config().with_settings(&AppSettings::new("stored-client", ""));
        assert_eq!(config.oauth.client_id.as_deref(), Some("stored-client"));
        assert_eq!(config.gemini.api_key.as_deref(), Some("env-key"));
    }

    #[test]
    fn test_placeholder_client_id_is_unconfigured() {
        let config = AppConfig::default().with_settings(&AppSettings::new(CLIENT_ID_PLACEHOLDER, ""));
        assert_eq!(config.oauth.client_id, None);
        assert!(config.oauth.authorize_url().is_err());
    }

    #[test]
    fn test_settings_round_trip_trimmed() {
        let store = MemoryStore::new();
        assert_eq!(load_settings(&store), AppSettings::default());

        let saved = save_settings(&store, &AppSettings::new(" id ", " key ")).unwrap();
        assert_eq!(saved, AppSettings::new("id", "key"));
        assert_eq!(load_settings(&store), saved);
    }

    #[test]
    fn test_corrupt_settings_are_defaults() {
        let store = MemoryStore::new();
        store.save(SETTINGS_KEY, "[1,2").unwrap();
        assert_eq!(load_settings(&store), AppSettings::default());
    }

    #[test]
    fn test_update_keeps_unspecified_values() {
        let store = MemoryStore::new();
        save_settings(&store, &AppSettings::new("id", "key")).unwrap();

        let updated = update_settings(&store, None, Some(" new-key ".into())).unwrap();
        assert_eq!(updated, AppSettings::new("id", "new-key"));
        assert_eq!(load_settings(&store), updated);
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "(not set)");
        assert_eq!(mask_secret("abc"), "****");
        assert_eq!(mask_secret("AIzaSyExample1234"), "****1234");
    }
}
