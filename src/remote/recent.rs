//! Recently imported repositories.

use super::client::RepositoryInfo;
use crate::error::StorageError;
use crate::store::{keys, Storage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Most entries kept
pub const MAX_RECENT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentRepository {
    pub name: String,
    pub owner: String,
    pub full_name: String,
    pub url: String,
    #[serde(default)]
    pub clone_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stars: u64,
    #[serde(default)]
    pub forks: u64,
    pub timestamp: DateTime<Utc>,
}

impl RecentRepository {
    pub fn from_info(info: &RepositoryInfo, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: info.name.clone(),
            owner: info.owner.clone(),
            full_name: info.full_name.clone(),
            url: info.html_url.clone(),
            clone_url: info.clone_url.clone(),
            description: info.description.clone(),
            language: info.language.clone(),
            stars: info.stars,
            forks: info.forks,
            timestamp,
        }
    }
}

/// Import history, newest first, one entry per owner+name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentRepositories {
    entries: Vec<RecentRepository>,
}

impl RecentRepositories {
    pub fn load(storage: &Storage) -> Self {
        storage.load_or_default(keys::RECENT_REPOSITORIES)
    }

    pub fn save(&self, storage: &Storage) -> Result<(), StorageError> {
        storage.save(keys::RECENT_REPOSITORIES, self)
    }

    pub fn entries(&self) -> &[RecentRepository] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move `entry` to the front, replacing any older record of the same repository.
    pub fn record(&mut self, entry: RecentRepository) {
        self.entries
            .retain(|e| !(e.name == entry.name && e.owner == entry.owner));
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_RECENT);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
