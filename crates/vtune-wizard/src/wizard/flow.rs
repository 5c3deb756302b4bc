//! Steps that call out to collaborators: generation, authorization, publish.

use tracing::{info, warn};
use url::Url;
use vtune_ai::{MetadataGenerator, MetadataRequest};
use vtune_auth::OAuthConfig;
use vtune_models::{PublishResult, Step, VideoMetadata};
use vtune_youtube::VideoUploader;

use super::Wizard;
use crate::error::{WizardError, WizardResult};
use crate::metrics;

impl Wizard {
    fn lost_video_error(&self) -> WizardError {
        WizardError::VideoReacquisitionRequired {
            file_name: self
                .payload
                .video_descriptor
                .as_ref()
                .map(|d| d.name.clone())
                .unwrap_or_else(|| "the original video".to_string()),
        }
    }

    /// Ask the generator for a metadata draft.
    ///
    /// The draft is returned, not committed. Failures leave the wizard
    /// untouched; retrying is a new call.
    pub async fn generate_metadata(
        &self,
        generator: &dyn MetadataGenerator,
        summary: Option<&str>,
    ) -> WizardResult<VideoMetadata> {
        if !self.is_step_enabled(Step::Metadata) {
            return Err(WizardError::StepLocked(Step::Metadata));
        }
        let video = self.payload.video.as_ref().ok_or_else(|| self.lost_video_error())?;

        let request = MetadataRequest::new(video.to_data_uri(), summary);
        match generator.generate(&request).await {
            Ok(draft) => {
                metrics::record_generation("success");
                info!(
                    session_id = %self.logger.session_id(),
                    tags = draft.tags.len(),
                    "Metadata draft generated"
                );
                Ok(draft)
            }
            Err(e) => {
                metrics::record_generation("failed");
                self.logger
                    .log_warning(&format!("metadata generation failed: {}", e));
                Err(e.into())
            }
        }
    }

    /// Build the authorize URL and persist the snapshot.
    ///
    /// The URL is only returned once the snapshot is saved, so the caller
    /// cannot start the redirect ahead of the persist. Nothing is persisted
    /// when OAuth is not configured.
    pub fn begin_authorization(&self, oauth: &OAuthConfig) -> WizardResult<Url> {
        if !self.is_step_enabled(Step::Publish) {
            return Err(WizardError::StepLocked(Step::Publish));
        }
        let url = oauth.authorize_url()?;
        self.snapshot_for_redirect()?;
        vtune_auth::metrics::record_authorize_redirect();
        Ok(url)
    }

    /// Upload the video with the stored token and commit step 5.
    ///
    /// Checked in order: step 5 enabled, video handle present (otherwise the
    /// reacquisition flag is raised), valid token present. A 401 from the
    /// uploader discards the token; other failures keep it.
    pub async fn publish(&mut self, uploader: &dyn VideoUploader) -> WizardResult<PublishResult> {
        if !self.is_step_enabled(Step::Publish) {
            return Err(WizardError::StepLocked(Step::Publish));
        }
        if self.payload.publish_result.is_some() {
            return Err(WizardError::illegal_transition(
                "the video is already published; reset to start over",
            ));
        }
        if self.payload.video.is_none() {
            self.needs_video_reacquisition = true;
            return Err(self.lost_video_error());
        }
        let token = self.tokens.access_token().ok_or(WizardError::NotAuthenticated)?;

        let (Some(video), Some(metadata)) = (&self.payload.video, &self.payload.metadata) else {
            return Err(WizardError::StepLocked(Step::Publish));
        };

        let video_id = match uploader.upload(video, metadata, token.secret()).await {
            Ok(video_id) => video_id,
            Err(e) => {
                if e.is_unauthorized() {
                    metrics::record_publish("unauthorized");
                    warn!(
                        session_id = %self.logger.session_id(),
                        "Upload rejected the access token, clearing it"
                    );
                    self.tokens.clear_token()?;
                } else {
                    metrics::record_publish("failed");
                    self.logger.log_warning(&format!("upload failed: {}", e));
                }
                return Err(e.into());
            }
        };

        let result = PublishResult::for_video_id(&self.watch_base, &video_id);
        self.commit_publish(result.url.clone())?;
        self.tokens.clear_token()?;
        self.needs_video_reacquisition = false;
        metrics::record_publish("success");
        Ok(result)
    }
}
