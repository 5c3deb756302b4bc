//! YouTube publishing.
//!
//! This crate provides:
//! - `VideoUploader`: the publish seam used by the wizard
//! - `YouTubeUploader`: multipart upload to the YouTube Data API

pub mod client;
pub mod error;
pub mod uploader;

pub use client::{YouTubeConfig, YouTubeUploader};
pub use error::{UploadError, UploadResult};
pub use uploader::VideoUploader;
