//! Typed JSON access on top of a [`StateStore`].
//!
//! Reads never fail: a value that cannot be read or decoded is logged and
//! reported as absent, so a corrupt entry degrades to a fresh session.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::StorageResult;
use crate::store::StateStore;

/// JSON helpers available on every store.
pub trait JsonStateExt {
    /// Serialize `value` and store it under `key`.
    fn save_json<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()>;

    /// Load and decode the value under `key`; unreadable values are `None`.
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T>;

    /// Load the value under `key` and delete it, whether or not it decoded.
    fn take_json<T: DeserializeOwned>(&self, key: &str) -> Option<T>;
}

impl<S: StateStore + ?Sized> JsonStateExt for S {
    fn save_json<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value)?;
        self.save(key, &raw)
    }

    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.load(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, "Failed to read stored value, treating as absent: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, "Stored value is malformed, treating as absent: {}", e);
                None
            }
        }
    }

    fn take_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.load_json(key);
        if let Err(e) = self.delete(key) {
            warn!(key, "Failed to delete consumed value: {}", e);
        }
        value
    }
}
