//! AI metadata generation.
//!
//! This crate provides:
//! - `MetadataGenerator`: the generation seam used by the wizard
//! - `GeminiClient`: a Gemini REST implementation

pub mod error;
pub mod gemini;
pub mod generator;

pub use error::{GenerationError, GenerationResult};
pub use gemini::{GeminiClient, GeminiConfig};
pub use generator::{MetadataGenerator, MetadataRequest};
