//! Redirect snapshot of wizard progress.
//!
//! Written once before the OAuth redirect and consumed once on the next
//! session start. Never contains the video handle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audio::AudioTrack;
use crate::error::{ModelError, ModelResult};
use crate::metadata::VideoMetadata;
use crate::publish::PublishResult;
use crate::step::{Step, StepSet};
use crate::video::VideoDescriptor;

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized wizard progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    /// Schema version
    pub version: u32,

    /// When the snapshot was written
    pub saved_at: DateTime<Utc>,

    pub current_step: Step,

    #[serde(default)]
    pub completed_steps: StepSet,

    #[serde(default)]
    pub video_descriptor: Option<VideoDescriptor>,

    #[serde(default)]
    pub audio_selection: Option<AudioTrack>,

    #[serde(default)]
    pub metadata: Option<VideoMetadata>,

    #[serde(default)]
    pub publish_result: Option<PublishResult>,
}

impl WizardSnapshot {
    /// Create a snapshot stamped with the current version and time.
    pub fn new(current_step: Step, completed_steps: StepSet) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            current_step,
            completed_steps,
            video_descriptor: None,
            audio_selection: None,
            metadata: None,
            publish_result: None,
        }
    }

    /// Check that the snapshot can be applied without breaking any invariant.
    pub fn validate(&self) -> ModelResult<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(ModelError::invalid_snapshot(format!(
                "unsupported snapshot version {}",
                self.version
            )));
        }

        if !self.completed_steps.is_in_order() {
            return Err(ModelError::invalid_snapshot(format!(
                "completed steps out of order: {:?}",
                self.completed_steps.numbers()
            )));
        }

        let missing_slice = [
            (Step::Upload, self.video_descriptor.is_none(), "video descriptor"),
            (Step::Audio, self.audio_selection.is_none(), "audio selection"),
            (Step::Metadata, self.metadata.is_none(), "metadata"),
            (Step::Publish, self.publish_result.is_none(), "publish result"),
        ]
        .into_iter()
        .find(|(step, missing, _)| *missing && self.completed_steps.contains(*step));
        if let Some((step, _, slice)) = missing_slice {
            return Err(ModelError::invalid_snapshot(format!(
                "step {} is complete but {} is missing",
                step, slice
            )));
        }

        if let Some(track) = &self.audio_selection {
            track.validate()?;
        }

        if let Some(metadata) = &self.metadata {
            metadata.validate()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WizardSnapshot {
        let mut snapshot = WizardSnapshot::new(
            Step::Publish,
            [Step::Upload, Step::Audio, Step::Metadata, Step::Preview]
                .into_iter()
                .collect(),
        );
        snapshot.video_descriptor = Some(VideoDescriptor {
            name: "clip.mp4".into(),
            mime_type: "video/mp4".into(),
            size_bytes: 1024,
        });
        snapshot.audio_selection = AudioTrack::find("track3");
        snapshot.metadata = Some(VideoMetadata::new("T", "D", vec!["x".into(), "y".into()]));
        snapshot
    }

    #[test]
    fn test_snapshot_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["currentStep"], 5);
        assert_eq!(json["completedSteps"], serde_json::json!([1, 2, 3, 4]));
        assert_eq!(json["videoDescriptor"]["name"], "clip.mp4");
        assert_eq!(json["audioSelection"]["id"], "track3");
        assert!(json["publishResult"].is_null());
    }

    #[test]
    fn test_valid_snapshot_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_out_of_order_snapshot_rejected() {
        let mut snapshot = sample();
        snapshot.completed_steps = [Step::Upload, Step::Preview].into_iter().collect();
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_unknown_track_rejected() {
        let mut snapshot = sample();
        if let Some(track) = snapshot.audio_selection.as_mut() {
            track.id = "track42".into();
        }
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_completed_step_without_slice_rejected() {
        let mut snapshot = sample();
        snapshot.metadata = None;
        assert!(snapshot.validate().is_err());

        let mut snapshot = sample();
        snapshot.video_descriptor = None;
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_wrong_version_rejected() {
        let mut snapshot = sample();
        snapshot.version = 99;
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_out_of_range_step_fails_to_parse() {
        let mut json = serde_json::to_value(sample()).unwrap();
        json["currentStep"] = serde_json::json!(7);
        assert!(serde_json::from_value::<WizardSnapshot>(json).is_err());
    }
}
