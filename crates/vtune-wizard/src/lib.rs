//! Publishing wizard state machine.
//!
//! This crate provides:
//! - `Wizard`: the five-step controller (commits, gating, reset, navigation)
//! - Redirect persistence: snapshot before the OAuth redirect, one-shot
//!   rehydration afterwards, and the lost-video reacquisition protocol
//! - Collaborator steps: metadata generation, authorization and publish

pub mod error;
pub mod logging;
pub mod metrics;
pub mod state;
pub mod wizard;

pub use error::{WizardError, WizardResult};
pub use logging::StepLogger;
pub use state::{is_step_enabled, WizardPayload, WizardProgress};
pub use wizard::{RehydrateOutcome, Wizard, SNAPSHOT_KEY};
