//! Shared data models for the VidTune publishing wizard.
//!
//! This crate provides Serde-serializable types for:
//! - Wizard steps and progress
//! - Video handles and their serializable descriptors
//! - The fixed background audio catalogue
//! - Video metadata (title, description, tags)
//! - Publish results and the redirect snapshot
//! - User settings

pub mod audio;
pub mod error;
pub mod metadata;
pub mod publish;
pub mod settings;
pub mod snapshot;
pub mod step;
pub mod video;

// Re-export common types
pub use audio::{AudioTrack, AUDIO_CATALOG};
pub use error::{ModelError, ModelResult};
pub use metadata::{normalize_tags, VideoMetadata};
pub use publish::{PublishResult, DEFAULT_WATCH_BASE};
pub use settings::{AppSettings, CLIENT_ID_PLACEHOLDER};
pub use snapshot::{WizardSnapshot, SNAPSHOT_VERSION};
pub use step::{Step, StepSet};
pub use video::{is_video_mime, mime_type_for_path, parse_data_uri, VideoDescriptor, VideoHandle};
