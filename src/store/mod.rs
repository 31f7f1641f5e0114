//! Local key-value storage
//!
//! String-keyed JSON blobs, the way a browser's local storage holds the
//! shell's project, tab session, preferences, notes and recent history.
//! Every value is wrapped in a versioned envelope (see [`envelope`]).

pub mod envelope;
pub mod memory;
pub mod persistence;

use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

pub use memory::MemoryStore;
pub use persistence::SledStore;

/// Well-known storage keys
pub mod keys {
    pub const PROJECT: &str = "project";
    pub const TABS_SESSION: &str = "tabs-session";
    pub const PREFERENCES: &str = "preferences";
    pub const NOTES: &str = "notes";
    pub const RECENT_REPOSITORIES: &str = "recent-repositories";
    pub const RECENT_PROJECTS: &str = "recent-projects";
}

/// Raw key-value backend
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Typed facade over a [`KeyValueStore`]
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Unbounded in-memory storage
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.backend
    }

    /// Load and decode a value. `Ok(None)` when the key is absent.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.backend.get(key)? {
            Some(raw) => envelope::decode(key, &raw).map(Some),
            None => Ok(None),
        }
    }

    /// Load a value, falling back to `T::default()` when the entry is
    /// missing, unreadable, or written by a newer version.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.load(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding unreadable stored entry");
                T::default()
            }
        }
    }

    /// Encode and store a value under the current envelope version.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = envelope::encode(value)?;
        self.backend.put(key, &raw)
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.backend.remove(key)
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}
