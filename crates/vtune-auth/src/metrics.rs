//! OAuth metrics.

use metrics::counter;

/// Metric names as constants for consistency.
pub mod names {
    pub const OAUTH_CALLBACKS_TOTAL: &str = "vidtune_oauth_callbacks_total";
    pub const OAUTH_AUTHORIZE_REDIRECTS_TOTAL: &str = "vidtune_oauth_authorize_redirects_total";
}

/// Record a processed callback (`success`, `error` or `invalid`).
pub fn record_callback(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::OAUTH_CALLBACKS_TOTAL, &labels).increment(1);
}

/// Record an authorize URL handed out for redirect.
pub fn record_authorize_redirect() {
    counter!(names::OAUTH_AUTHORIZE_REDIRECTS_TOTAL).increment(1);
}
