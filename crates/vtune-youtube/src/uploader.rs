//! Video uploader seam.

use async_trait::async_trait;
use vtune_models::{VideoHandle, VideoMetadata};

use crate::error::UploadResult;

/// Publishes a video and returns the platform's video id.
#[async_trait]
pub trait VideoUploader: Send + Sync {
    async fn upload(
        &self,
        video: &VideoHandle,
        metadata: &VideoMetadata,
        access_token: &str,
    ) -> UploadResult<String>;
}
