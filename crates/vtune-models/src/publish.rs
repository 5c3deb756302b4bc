//! Publish results.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Base URL for watch links.
pub const DEFAULT_WATCH_BASE: &str = "https://www.youtube.com";

/// Outcome of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PublishResult {
    /// Public watch URL of the uploaded video
    pub url: String,
}

impl PublishResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Build the watch URL for an uploaded video id.
    pub fn for_video_id(watch_base: &str, video_id: &str) -> Self {
        Self {
            url: format!("{}/watch?v={}", watch_base.trim_end_matches('/'), video_id),
        }
    }
}
