//! Sled-backed key-value store for the headless shell.

use super::KeyValueStore;
use crate::error::StorageError;
use std::path::Path;

/// On-disk store; every write is flushed before returning.
pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Throwaway database removed on drop
    pub fn temporary() -> Result<Self, StorageError> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.db.get(key.as_bytes())? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|_| StorageError::InvalidEncoding(key.to_string())),
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.db.insert(key.as_bytes(), value.as_bytes())?;
        self.db.flush()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.db.remove(key.as_bytes())?;
        self.db.flush()?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.db
            .iter()
            .keys()
            .map(|k| {
                let k = k?;
                String::from_utf8(k.to_vec())
                    .map_err(|_| StorageError::InvalidEncoding(String::from_utf8_lossy(&k).into()))
            })
            .collect()
    }
}
