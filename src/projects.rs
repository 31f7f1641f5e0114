//! Recently opened projects.

use crate::error::StorageError;
use crate::store::{keys, Storage};
use crate::tree::ProjectTemplate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Most entries kept
pub const MAX_RECENT_PROJECTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentProject {
    pub id: String,
    pub name: String,
    /// Template the project was created from; `None` for imports
    #[serde(rename = "type", default)]
    pub template: Option<ProjectTemplate>,
    pub created: DateTime<Utc>,
    pub last_opened: DateTime<Utc>,
}

/// Project history, newest first, one entry per project name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentProjects {
    entries: Vec<RecentProject>,
}

impl RecentProjects {
    pub fn load(storage: &Storage) -> Self {
        storage.load_or_default(keys::RECENT_PROJECTS)
    }

    pub fn save(&self, storage: &Storage) -> Result<(), StorageError> {
        storage.save(keys::RECENT_PROJECTS, self)
    }

    pub fn entries(&self) -> &[RecentProject] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move `name` to the front. A reopened project keeps its id and
    /// creation time; a template given here replaces the stored one.
    pub fn record(&mut self, name: &str, template: Option<ProjectTemplate>, now: DateTime<Utc>) -> &RecentProject {
        let entry = match self.entries.iter().position(|e| e.name == name) {
            Some(index) => {
                let mut entry = self.entries.remove(index);
                entry.last_opened = now;
                if template.is_some() {
                    entry.template = template;
                }
                entry
            }
            None => RecentProject {
                id: now.timestamp_millis().to_string(),
                name: name.to_string(),
                template,
                created: now,
                last_opened: now,
            },
        };
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_RECENT_PROJECTS);
        &self.entries[0]
    }
}
