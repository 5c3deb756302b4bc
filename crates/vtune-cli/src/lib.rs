//! Terminal front end for the VidTune publishing wizard.
//!
//! This crate provides:
//! - Configuration from the environment plus persisted user settings
//! - Tracing initialization
//! - The interactive session: command parsing, the metadata draft and the
//!   mapping of commands onto wizard operations

pub mod commands;
pub mod config;
pub mod draft;
pub mod logging;
pub mod session;

pub use commands::{Command, ParseError};
pub use config::{load_settings, mask_secret, save_settings, update_settings, AppConfig};
pub use draft::MetadataDraft;
pub use logging::init_tracing;
pub use session::{load_video, Session, SessionEnd};
