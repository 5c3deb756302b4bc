//! The key-value store contract.

use std::sync::Arc;

use crate::error::StorageResult;

/// Durable key-value store holding string values.
///
/// Implementations are single-writer by construction (one session at a
/// time) but must be shareable between the wizard and the token lifecycle.
pub trait StateStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Returns only after the value is durable.
    fn save(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Read the value under `key`. Absence is `Ok(None)`.
    fn load(&self, key: &str) -> StorageResult<Option<String>>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> StorageResult<()>;
}

/// Store shared between components of one session.
pub type SharedStore = Arc<dyn StateStore>;

impl<S: StateStore + ?Sized> StateStore for Arc<S> {
    fn save(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).save(key, value)
    }

    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).load(key)
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        (**self).delete(key)
    }
}
