//! Wizard metrics.

use metrics::counter;
use vtune_models::Step;

/// Metric names as constants for consistency.
pub mod names {
    pub const STEP_COMMITS_TOTAL: &str = "vidtune_wizard_step_commits_total";
    pub const RESETS_TOTAL: &str = "vidtune_wizard_resets_total";
    pub const REHYDRATIONS_TOTAL: &str = "vidtune_wizard_rehydrations_total";
    pub const PUBLISH_ATTEMPTS_TOTAL: &str = "vidtune_publish_attempts_total";
    pub const METADATA_GENERATIONS_TOTAL: &str = "vidtune_metadata_generations_total";
}

/// Record a committed step.
pub fn record_step_commit(step: Step) {
    let labels = [("step", step.number().to_string())];
    counter!(names::STEP_COMMITS_TOTAL, &labels).increment(1);
}

/// Record a full reset.
pub fn record_reset() {
    counter!(names::RESETS_TOTAL).increment(1);
}

/// Record a rehydration attempt (`restored`, `empty` or `discarded`).
pub fn record_rehydration(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::REHYDRATIONS_TOTAL, &labels).increment(1);
}

/// Record a publish attempt (`success`, `unauthorized` or `failed`).
pub fn record_publish(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::PUBLISH_ATTEMPTS_TOTAL, &labels).increment(1);
}

/// Record a metadata generation call (`success` or `failed`).
pub fn record_generation(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::METADATA_GENERATIONS_TOTAL, &labels).increment(1);
}
