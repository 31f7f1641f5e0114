//! Open tab state and its persisted form.

use crate::editor::language_for_path;
use serde::{Deserialize, Serialize};

/// Per-tab lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabState {
    Clean,
    Dirty,
}

/// An open editing session for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    path: String,
    buffer: String,
    /// Content last written to the tree and persisted
    baseline: String,
    language: String,
    modified: bool,
    opened_seq: u64,
}

impl Tab {
    pub(crate) fn new(path: String, content: String, opened_seq: u64) -> Self {
        let language = language_for_path(&path).to_string();
        Self {
            path,
            buffer: content.clone(),
            baseline: content,
            language,
            modified: false,
            opened_seq,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn state(&self) -> TabState {
        if self.modified {
            TabState::Dirty
        } else {
            TabState::Clean
        }
    }

    /// Display title: leaf name, prefixed with `* ` while dirty.
    pub fn title(&self) -> String {
        let name = crate::tree::path::leaf_name(&self.path);
        if self.modified {
            format!("* {}", name)
        } else {
            name
        }
    }

    pub(crate) fn opened_seq(&self) -> u64 {
        self.opened_seq
    }

    /// Replace the buffer and recompute the dirty flag against the baseline.
    ///
    /// Returns true when the flag changed.
    pub(crate) fn set_buffer(&mut self, buffer: String) -> bool {
        self.buffer = buffer;
        let modified = self.buffer != self.baseline;
        let changed = modified != self.modified;
        self.modified = modified;
        changed
    }

    /// Record that the current buffer was written and persisted.
    pub(crate) fn mark_saved(&mut self) {
        self.baseline = self.buffer.clone();
        self.modified = false;
    }

    /// Drop in-progress edits.
    pub(crate) fn revert(&mut self) {
        self.buffer = self.baseline.clone();
        self.modified = false;
    }

    pub(crate) fn relocate(&mut self, path: String) {
        self.language = language_for_path(&path).to_string();
        self.path = path;
    }

    pub(crate) fn to_record(&self) -> TabRecord {
        TabRecord {
            path: self.path.clone(),
            content: self.buffer.clone(),
            language: self.language.clone(),
            modified: self.modified,
        }
    }
}

/// Persisted tab entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabRecord {
    pub path: String,
    pub content: String,
    pub language: String,
    pub modified: bool,
}

/// Persisted tab session: open tabs in order plus the active index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub tabs: Vec<TabRecord>,
    #[serde(rename = "activeTabIndex", default)]
    pub active_tab_index: Option<usize>,
}
