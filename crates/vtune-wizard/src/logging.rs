//! Structured session logging.
//!
//! Every wizard event is logged with the session id so that the events of one
//! run (and the run that rehydrates it) can be correlated.

use tracing::{info, warn, Span};
use uuid::Uuid;
use vtune_models::Step;

/// Per-session logger for wizard lifecycle events.
#[derive(Debug, Clone)]
pub struct StepLogger {
    session_id: String,
}

impl StepLogger {
    /// Logger with a fresh session id.
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn from_string(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
        }
    }

    pub fn log_commit(&self, step: Step, next: Step) {
        info!(
            session_id = %self.session_id,
            step = step.number(),
            next_step = next.number(),
            "Step committed: {}", step.label()
        );
    }

    pub fn log_navigation(&self, from: Step, to: Step) {
        info!(
            session_id = %self.session_id,
            from = from.number(),
            to = to.number(),
            "Navigated"
        );
    }

    pub fn log_reset(&self) {
        info!(session_id = %self.session_id, "Wizard reset");
    }

    pub fn log_snapshot(&self, step: Step, completed: usize) {
        info!(
            session_id = %self.session_id,
            step = step.number(),
            completed,
            "Saved redirect snapshot"
        );
    }

    pub fn log_rehydrate(&self, outcome: &str, step: Step, needs_reacquisition: bool) {
        info!(
            session_id = %self.session_id,
            outcome,
            step = step.number(),
            needs_reacquisition,
            "Rehydration finished"
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(session_id = %self.session_id, "Wizard progress: {}", message);
    }

    pub fn log_warning(&self, message: &str) {
        warn!(session_id = %self.session_id, "Wizard warning: {}", message);
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Create a tracing span for this session.
    pub fn create_span(&self) -> Span {
        tracing::info_span!("wizard", session_id = %self.session_id)
    }
}

impl Default for StepLogger {
    fn default() -> Self {
        Self::new()
    }
}
