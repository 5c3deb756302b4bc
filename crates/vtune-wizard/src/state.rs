//! Wizard progress, payload and the step-gating predicate.

use vtune_models::{
    AudioTrack, PublishResult, Step, StepSet, VideoDescriptor, VideoHandle, VideoMetadata,
};

/// Where the user is and which steps are committed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardProgress {
    pub current_step: Step,
    pub completed_steps: StepSet,
}

/// Domain state carried through the flow.
#[derive(Debug, Default)]
pub struct WizardPayload {
    /// Selected video content; lost across a redirect
    pub video: Option<VideoHandle>,
    /// Shadow of `video`; survives a redirect
    pub video_descriptor: Option<VideoDescriptor>,
    pub audio_selection: Option<AudioTrack>,
    pub metadata: Option<VideoMetadata>,
    pub publish_result: Option<PublishResult>,
}

impl WizardPayload {
    /// True if nothing is set.
    pub fn is_empty(&self) -> bool {
        self.video.is_none()
            && self.video_descriptor.is_none()
            && self.audio_selection.is_none()
            && self.metadata.is_none()
            && self.publish_result.is_none()
    }

    /// Descriptor present but handle lost.
    pub fn video_lost(&self) -> bool {
        self.video.is_none() && self.video_descriptor.is_some()
    }
}

/// Check whether a step may be entered.
///
/// Rules, first match wins:
/// 1. A publish result locks everything but step 5.
/// 2. Step 1 is always enabled.
/// 3. Step 5 needs audio, metadata and a completed step 4.
/// 4. Steps 2-4 need a completed predecessor, or the slice the step produces,
///    or the slice it consumes.
pub fn is_step_enabled(step: Step, progress: &WizardProgress, payload: &WizardPayload) -> bool {
    if payload.publish_result.is_some() {
        return step == Step::Publish;
    }

    let completed = |s: Step| progress.completed_steps.contains(s);

    match step {
        Step::Upload => true,
        Step::Audio => {
            completed(Step::Upload)
                || payload.audio_selection.is_some()
                || payload.video_descriptor.is_some()
        }
        Step::Metadata => {
            completed(Step::Audio) || payload.metadata.is_some() || payload.audio_selection.is_some()
        }
        Step::Preview => completed(Step::Metadata) || payload.metadata.is_some(),
        Step::Publish => {
            payload.audio_selection.is_some()
                && payload.metadata.is_some()
                && completed(Step::Preview)
        }
    }
}
