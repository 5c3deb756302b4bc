//! YouTube Data API v3 multipart uploader.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vtune_models::{VideoHandle, VideoMetadata, DEFAULT_WATCH_BASE};

use crate::error::{UploadError, UploadResult};
use crate::uploader::VideoUploader;

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com";

/// "People & Blogs".
const DEFAULT_CATEGORY_ID: &str = "22";

const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 600;

/// Configuration for the uploader.
#[derive(Debug, Clone)]
pub struct YouTubeConfig {
    /// API base URL
    pub api_base: String,
    /// Base URL for watch links
    pub watch_base: String,
    /// Upload request timeout
    pub timeout: Duration,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            watch_base: DEFAULT_WATCH_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECS),
        }
    }
}

impl YouTubeConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            api_base: std::env::var("YOUTUBE_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            watch_base: std::env::var("YOUTUBE_WATCH_BASE")
                .unwrap_or_else(|_| DEFAULT_WATCH_BASE.to_string()),
            timeout: Duration::from_secs(
                std::env::var("YOUTUBE_UPLOAD_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_UPLOAD_TIMEOUT_SECS),
            ),
        }
    }
}

/// Request body of the `metadata` part.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoResource<'a> {
    snippet: Snippet<'a>,
    status: Status,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Snippet<'a> {
    title: &'a str,
    description: &'a str,
    tags: &'a [String],
    category_id: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Status {
    privacy_status: &'static str,
    self_declared_made_for_kids: bool,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// YouTube uploader.
#[derive(Clone)]
pub struct YouTubeUploader {
    client: Client,
    api_base: String,
}

impl YouTubeUploader {
    pub fn new(config: &YouTubeConfig) -> UploadResult<Self> {
        if !(config.api_base.starts_with("https://") || config.api_base.starts_with("http://")) {
            return Err(UploadError::config_error(format!(
                "YOUTUBE_API_BASE must be an http(s) URL, got \"{}\"",
                config.api_base
            )));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/upload/youtube/v3/videos?uploadType=multipart&part=snippet,status",
            self.api_base
        )
    }

    fn build_form(video: &VideoHandle, metadata: &VideoMetadata) -> UploadResult<Form> {
        let resource = VideoResource {
            snippet: Snippet {
                title: &metadata.title,
                description: &metadata.description,
                tags: &metadata.tags,
                category_id: DEFAULT_CATEGORY_ID,
            },
            status: Status {
                privacy_status: "private",
                self_declared_made_for_kids: false,
            },
        };

        let metadata_part = Part::text(serde_json::to_string(&resource)?)
            .mime_str("application/json; charset=UTF-8")?;
        let video_part = Part::bytes(video.bytes().to_vec())
            .file_name(video.name().to_string())
            .mime_str(video.mime_type())?;

        Ok(Form::new()
            .part("metadata", metadata_part)
            .part("video", video_part))
    }
}

#[async_trait]
impl VideoUploader for YouTubeUploader {
    async fn upload(
        &self,
        video: &VideoHandle,
        metadata: &VideoMetadata,
        access_token: &str,
    ) -> UploadResult<String> {
        info!(
            file = %video.name(),
            size_bytes = video.size_bytes(),
            tags = metadata.tags.len(),
            "Uploading video to YouTube"
        );

        let form = Self::build_form(video, metadata)?;
        let response = self
            .client
            .post(self.upload_url())
            .bearer_auth(access_token)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| "Failed to upload video to YouTube.".to_string());
            warn!(status = status.as_u16(), "YouTube upload failed: {}", message);
            return Err(UploadError::from_http_status(status.as_u16(), message));
        }

        let parsed: UploadResponse = serde_json::from_str(&body)?;
        let video_id = parsed
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| UploadError::invalid_response("response has no video id"))?;

        info!(video_id = %video_id, "Uploaded video to YouTube");
        Ok(video_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_part_shape() {
        let metadata = VideoMetadata::new("T", "D", vec!["x".into(), "y".into()]);
        let resource = VideoResource {
            snippet: Snippet {
                title: &metadata.title,
                description: &metadata.description,
                tags: &metadata.tags,
                category_id: DEFAULT_CATEGORY_ID,
            },
            status: Status {
                privacy_status: "private",
                self_declared_made_for_kids: false,
            },
        };
        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["snippet"]["categoryId"], "22");
        assert_eq!(json["snippet"]["tags"], serde_json::json!(["x", "y"]));
        assert_eq!(json["status"]["privacyStatus"], "private");
        assert_eq!(json["status"]["selfDeclaredMadeForKids"], false);
    }

    #[test]
    fn test_api_base_must_be_http() {
        let err = YouTubeUploader::new(&YouTubeConfig {
            api_base: "www.googleapis.com".into(),
            ..YouTubeConfig::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, UploadError::ConfigError(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_upload_url_trims_trailing_slash() {
        let uploader = YouTubeUploader::new(&YouTubeConfig {
            api_base: "http://127.0.0.1:1/".into(),
            ..YouTubeConfig::default()
        })
        .unwrap();
        assert_eq!(
            uploader.upload_url(),
            "http://127.0.0.1:1/upload/youtube/v3/videos?uploadType=multipart&part=snippet,status"
        );
    }
}
