//! Metadata generator seam.

use async_trait::async_trait;
use vtune_models::VideoMetadata;

use crate::error::GenerationResult;

/// Input for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRequest {
    /// Video content as `data:<mime>;base64,<data>`
    pub video_data_uri: String,
    /// Optional user summary of the video
    pub summary: Option<String>,
}

impl MetadataRequest {
    /// Build a request, dropping a blank summary.
    pub fn new(video_data_uri: impl Into<String>, summary: Option<&str>) -> Self {
        Self {
            video_data_uri: video_data_uri.into(),
            summary: summary
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
        }
    }
}

/// Produces title, description and tags for a video.
///
/// Implementations never retry on their own; a retry is a new call.
#[async_trait]
pub trait MetadataGenerator: Send + Sync {
    async fn generate(&self, request: &MetadataRequest) -> GenerationResult<VideoMetadata>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_summary_is_dropped() {
        assert_eq!(MetadataRequest::new("data:video/mp4;base64,AA==", Some("  ")).summary, None);
        assert_eq!(
            MetadataRequest::new("data:video/mp4;base64,AA==", Some(" beach day ")).summary.as_deref(),
            Some("beach day")
        );
    }
}
