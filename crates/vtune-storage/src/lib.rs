//! Durable key-value store for wizard state.
//!
//! This crate provides:
//! - The `StateStore` contract (save/load/delete of string values)
//! - `MemoryStore`, an in-memory implementation for tests and ephemeral runs
//! - `FileStore`, a JSON-file implementation that survives process restarts
//! - Typed JSON helpers that treat corrupt values as absent

pub mod error;
pub mod file_store;
pub mod json;
pub mod memory;
pub mod store;

pub use error::{StorageError, StorageResult};
pub use file_store::FileStore;
pub use json::JsonStateExt;
pub use memory::MemoryStore;
pub use store::{SharedStore, StateStore};
