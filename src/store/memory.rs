//! In-memory key-value backend with an optional byte quota.

use super::KeyValueStore;
use crate::error::StorageError;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Map-backed store. With a quota, writes that would push the total size of
/// keys and values past the limit fail with `QuotaExceeded`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    /// Bytes used by keys and values
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write();
        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = key.len() + value.len();
            let available = quota.saturating_sub(others);
            if needed > available {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    available,
                });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys: Vec<_> = self.entries.read().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
