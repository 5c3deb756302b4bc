//! The five-step wizard state machine.
//!
//! Commits advance the step pointer and mark completion in order. Progress and
//! payload (minus the video handle) can be snapshotted into the state store
//! right before the OAuth redirect and rehydrated exactly once afterwards.

mod flow;

use vtune_auth::{CredentialState, TokenLifecycle};
use vtune_models::{
    AudioTrack, PublishResult, Step, StepSet, VideoHandle, VideoMetadata, WizardSnapshot,
    DEFAULT_WATCH_BASE,
};
use vtune_storage::{JsonStateExt, SharedStore, StateStore};

use crate::error::{WizardError, WizardResult};
use crate::logging::StepLogger;
use crate::metrics;
use crate::state::{is_step_enabled, WizardPayload, WizardProgress};

/// Store key of the redirect snapshot.
pub const SNAPSHOT_KEY: &str = "vidtune_app_state";

/// Result of [`Wizard::rehydrate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RehydrateOutcome {
    /// A snapshot was applied
    Restored,
    /// No snapshot was stored
    Empty,
    /// A snapshot was stored but unusable; it was deleted
    Discarded,
}

impl RehydrateOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RehydrateOutcome::Restored => "restored",
            RehydrateOutcome::Empty => "empty",
            RehydrateOutcome::Discarded => "discarded",
        }
    }
}

/// Wizard controller for one session.
pub struct Wizard {
    store: SharedStore,
    tokens: TokenLifecycle,
    progress: WizardProgress,
    payload: WizardPayload,
    needs_video_reacquisition: bool,
    watch_base: String,
    logger: StepLogger,
}

impl Wizard {
    /// Fresh wizard at step 1 over the given store.
    pub fn new(store: SharedStore) -> Self {
        let tokens = TokenLifecycle::new(store.clone());
        Self {
            store,
            tokens,
            progress: WizardProgress::default(),
            payload: WizardPayload::default(),
            needs_video_reacquisition: false,
            watch_base: DEFAULT_WATCH_BASE.to_string(),
            logger: StepLogger::new(),
        }
    }

    /// Base URL used to build watch links after publishing.
    pub fn with_watch_base(mut self, watch_base: impl Into<String>) -> Self {
        self.watch_base = watch_base.into();
        self
    }

    pub fn with_logger(mut self, logger: StepLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn current_step(&self) -> Step {
        self.progress.current_step
    }

    pub fn completed_steps(&self) -> &StepSet {
        &self.progress.completed_steps
    }

    pub fn progress(&self) -> &WizardProgress {
        &self.progress
    }

    pub fn payload(&self) -> &WizardPayload {
        &self.payload
    }

    /// Set after rehydration when the publish step needs the video again.
    pub fn needs_video_reacquisition(&self) -> bool {
        self.needs_video_reacquisition
    }

    pub fn tokens(&self) -> &TokenLifecycle {
        &self.tokens
    }

    pub fn logger(&self) -> &StepLogger {
        &self.logger
    }

    /// Current token/error pair. A stored error is returned once.
    pub fn credentials(&self) -> CredentialState {
        self.tokens.read_and_keep()
    }

    pub fn is_step_enabled(&self, step: Step) -> bool {
        is_step_enabled(step, &self.progress, &self.payload)
    }

    /// Indicator label, reflecting whether metadata is being edited.
    pub fn step_label(&self, step: Step) -> &'static str {
        match (step, &self.payload.metadata) {
            (Step::Metadata, Some(metadata)) if metadata.has_content() => "Edit Metadata",
            _ => step.label(),
        }
    }

    /// Move the step pointer without touching payload or completion.
    pub fn navigate_to(&mut self, step: Step) -> WizardResult<()> {
        if !self.is_step_enabled(step) {
            return Err(WizardError::StepLocked(step));
        }
        let from = self.progress.current_step;
        self.progress.current_step = step;
        self.logger.log_navigation(from, step);
        Ok(())
    }

    /// Step 1: select the video.
    pub fn commit_upload(&mut self, handle: VideoHandle) -> WizardResult<()> {
        if !handle.is_video() {
            return Err(WizardError::invalid_input(format!(
                "{} is not a video file ({})",
                handle.name(),
                handle.mime_type()
            )));
        }
        self.ensure_committable(Step::Upload)?;

        self.payload.video_descriptor = Some(handle.descriptor());
        self.payload.video = Some(handle);
        self.needs_video_reacquisition = false;
        self.complete(Step::Upload);
        Ok(())
    }

    /// Step 2: pick a catalogue track.
    pub fn commit_audio(&mut self, selection: AudioTrack) -> WizardResult<()> {
        self.ensure_committable(Step::Audio)?;
        selection.validate()?;

        self.payload.audio_selection = Some(selection);
        self.complete(Step::Audio);
        Ok(())
    }

    /// Step 3: accept title, description and tags.
    ///
    /// Tags are normalized (trimmed, empties and duplicates dropped) before
    /// they are stored.
    pub fn commit_metadata(&mut self, metadata: VideoMetadata) -> WizardResult<()> {
        self.ensure_committable(Step::Metadata)?;
        let metadata = metadata.normalized()?;

        self.payload.metadata = Some(metadata);
        self.complete(Step::Metadata);
        Ok(())
    }

    /// Step 4: confirm the preview.
    pub fn commit_preview(&mut self) -> WizardResult<()> {
        self.ensure_committable(Step::Preview)?;
        self.complete(Step::Preview);
        Ok(())
    }

    /// Step 5: record the published URL. The wizard stays on step 5.
    pub fn commit_publish(&mut self, url: impl Into<String>) -> WizardResult<()> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(WizardError::validation("publish URL must not be empty"));
        }
        self.ensure_committable(Step::Publish)?;

        self.payload.publish_result = Some(PublishResult::new(url));
        self.complete(Step::Publish);
        Ok(())
    }

    /// Replace the video handle lost across a redirect.
    pub fn reacquire_video(&mut self, handle: VideoHandle) -> WizardResult<()> {
        if self.progress.current_step != Step::Publish {
            return Err(WizardError::illegal_transition(
                "the video can only be re-selected on the publish step",
            ));
        }
        if self.payload.video.is_some() {
            return Err(WizardError::illegal_transition("the video is already selected"));
        }
        if self.payload.video_descriptor.is_none() {
            return Err(WizardError::illegal_transition("there is no previous video to replace"));
        }
        if !handle.is_video() {
            return Err(WizardError::invalid_input(format!(
                "{} is not a video file ({})",
                handle.name(),
                handle.mime_type()
            )));
        }

        self.payload.video_descriptor = Some(handle.descriptor());
        self.payload.video = Some(handle);
        self.needs_video_reacquisition = false;
        self.logger.log_progress("video re-selected after redirect");
        Ok(())
    }

    /// Clear progress, payload, credentials and any stored snapshot.
    ///
    /// In-memory state is cleared even if the store fails.
    pub fn reset(&mut self) -> WizardResult<()> {
        self.progress = WizardProgress::default();
        self.payload = WizardPayload::default();
        self.needs_video_reacquisition = false;

        self.tokens.clear_all()?;
        self.store.delete(SNAPSHOT_KEY)?;

        metrics::record_reset();
        self.logger.log_reset();
        Ok(())
    }

    /// Serializable view of the current state.
    pub fn snapshot(&self) -> WizardSnapshot {
        let mut snapshot = WizardSnapshot::new(
            self.progress.current_step,
            self.progress.completed_steps.clone(),
        );
        snapshot.video_descriptor = self.payload.video_descriptor.clone();
        snapshot.audio_selection = self.payload.audio_selection.clone();
        snapshot.metadata = self.payload.metadata.clone();
        snapshot.publish_result = self.payload.publish_result.clone();
        snapshot
    }

    /// Persist the snapshot. Must return before the redirect starts.
    pub fn snapshot_for_redirect(&self) -> WizardResult<()> {
        let snapshot = self.snapshot();
        self.store.save_json(SNAPSHOT_KEY, &snapshot)?;
        self.logger
            .log_snapshot(snapshot.current_step, snapshot.completed_steps.len());
        Ok(())
    }

    /// Apply and consume a stored snapshot, if any.
    ///
    /// The snapshot is deleted before it is applied; a failed delete is logged
    /// and the snapshot still applies. Unreadable or invalid snapshots are
    /// dropped and the session starts fresh. Without a snapshot this is a
    /// no-op.
    pub fn rehydrate(&mut self) -> WizardResult<RehydrateOutcome> {
        let raw = match self.store.load(SNAPSHOT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                metrics::record_rehydration(RehydrateOutcome::Empty.as_str());
                return Ok(RehydrateOutcome::Empty);
            }
            Err(e) => {
                self.logger
                    .log_warning(&format!("failed to read snapshot, starting fresh: {}", e));
                return self.finish_rehydrate(RehydrateOutcome::Discarded);
            }
        };

        if let Err(e) = self.store.delete(SNAPSHOT_KEY) {
            self.logger
                .log_warning(&format!("failed to delete consumed snapshot: {}", e));
        }

        let snapshot = match parse_snapshot(&raw) {
            Ok(snapshot) => snapshot,
            Err(reason) => {
                self.logger
                    .log_warning(&format!("discarding stored snapshot: {}", reason));
                return self.finish_rehydrate(RehydrateOutcome::Discarded);
            }
        };

        self.apply_snapshot(snapshot);
        self.finish_rehydrate(RehydrateOutcome::Restored)
    }

    fn apply_snapshot(&mut self, snapshot: WizardSnapshot) {
        self.progress = WizardProgress {
            current_step: snapshot.current_step,
            completed_steps: snapshot.completed_steps,
        };
        self.payload = WizardPayload {
            video: None,
            video_descriptor: snapshot.video_descriptor,
            audio_selection: snapshot.audio_selection,
            metadata: snapshot.metadata,
            publish_result: snapshot.publish_result,
        };

        if !self.is_step_enabled(self.progress.current_step) {
            self.logger
                .log_warning("restored step is not reachable, returning to step 1");
            self.progress.current_step = Step::Upload;
        }

        self.needs_video_reacquisition = self.payload.video_lost()
            && self.progress.current_step == Step::Publish
            && self.tokens.has_valid_token();
    }

    fn finish_rehydrate(&mut self, outcome: RehydrateOutcome) -> WizardResult<RehydrateOutcome> {
        metrics::record_rehydration(outcome.as_str());
        self.logger.log_rehydrate(
            outcome.as_str(),
            self.progress.current_step,
            self.needs_video_reacquisition,
        );
        Ok(outcome)
    }

    fn ensure_committable(&self, step: Step) -> WizardResult<()> {
        if !self.is_step_enabled(step) {
            return Err(WizardError::StepLocked(step));
        }
        if let Some(missing) = step.previous() {
            if !self.progress.completed_steps.contains(missing) {
                return Err(WizardError::OutOfOrder { step, missing });
            }
        }
        Ok(())
    }

    fn complete(&mut self, step: Step) {
        self.progress.completed_steps.insert(step);
        let next = step.next().unwrap_or(step);
        self.progress.current_step = next;
        metrics::record_step_commit(step);
        self.logger.log_commit(step, next);
    }
}

fn parse_snapshot(raw: &str) -> Result<WizardSnapshot, String> {
    let snapshot: WizardSnapshot = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    snapshot.validate().map_err(|e| e.to_string())?;
    Ok(snapshot)
}
