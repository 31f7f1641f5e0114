//! Tab manager
//!
//! Owns the ordered set of open tabs, the active tab, and the editor adapter
//! that displays it. At most one tab exists per path. Saving writes the
//! buffer into the project tree and persists the project; every change to
//! the open set persists the tab session.

use super::tab::{SessionSnapshot, Tab};
use crate::editor::{EditorAdapter, EditorEvent};
use crate::error::ShellError;
use crate::store::{keys, Storage};
use crate::tree::{path, Project};
use tracing::{debug, info, warn};

/// What to do with the outgoing tab's edits when switching tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchMode {
    /// Save the outgoing buffer into the tree and storage
    #[default]
    Flush,
    /// Drop the outgoing buffer's unsaved edits
    Discard,
}

/// Answer to the unsaved-changes prompt when closing a dirty tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsavedDecision {
    Save,
    Discard,
    Cancel,
}

/// Result of [`TabManager::close`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    Cancelled,
}

pub struct TabManager {
    tabs: Vec<Tab>,
    active: Option<String>,
    next_seq: u64,
    editor: Box<dyn EditorAdapter>,
    storage: Storage,
}

impl TabManager {
    pub fn new(editor: Box<dyn EditorAdapter>, storage: Storage) -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            next_seq: 0,
            editor,
            storage,
        }
    }

    pub fn editor(&self) -> &dyn EditorAdapter {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> &mut dyn EditorAdapter {
        self.editor.as_mut()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn get(&self, target: &str) -> Option<&Tab> {
        self.position(target).map(|i| &self.tabs[i])
    }

    pub fn is_open(&self, target: &str) -> bool {
        self.position(target).is_some()
    }

    pub fn active_path(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active.as_deref().and_then(|p| self.get(p))
    }

    fn position(&self, target: &str) -> Option<usize> {
        let normalized = path::normalize(target);
        self.tabs.iter().position(|t| t.path() == normalized)
    }

    fn require(&self, target: &str) -> Result<usize, ShellError> {
        self.position(target)
            .ok_or_else(|| ShellError::NotFound(path::normalize(target)))
    }

    /// Open a file in a tab and make it active.
    ///
    /// An already-open path is activated instead of duplicated. The outgoing
    /// active tab is flushed first.
    pub fn open(&mut self, project: &mut Project, target: &str) -> Result<&Tab, ShellError> {
        let normalized = path::normalize(target);
        if self.position(&normalized).is_none() {
            let content = match project.file(&normalized) {
                Ok(file) => file.content.clone(),
                Err(ShellError::NotFound(p)) => return Err(ShellError::FileNotFound(p)),
                Err(e) => return Err(e),
            };
            self.leave_active(project, SwitchMode::Flush)?;
            let seq = self.next_seq;
            self.next_seq += 1;
            self.tabs.push(Tab::new(normalized.clone(), content, seq));
            debug!(path = %normalized, "Opened tab");
        } else {
            self.leave_active(project, SwitchMode::Flush)?;
        }
        self.active = Some(normalized.clone());
        self.load_active();
        self.persist_session();
        let index = self.require(&normalized)?;
        Ok(&self.tabs[index])
    }

    /// Switch the active tab, handling the outgoing tab's edits per `mode`.
    pub fn activate(
        &mut self,
        project: &mut Project,
        target: &str,
        mode: SwitchMode,
    ) -> Result<(), ShellError> {
        let index = self.require(target)?;
        let normalized = self.tabs[index].path().to_string();
        if self.active.as_deref() == Some(normalized.as_str()) {
            return Ok(());
        }
        self.leave_active(project, mode)?;
        self.active = Some(normalized);
        self.load_active();
        self.persist_session();
        Ok(())
    }

    /// Close a tab.
    ///
    /// A dirty tab needs a `decision`; without one the call fails with
    /// `UnsavedChanges` and nothing changes. Closing the active tab
    /// activates the most recently opened remaining tab, or clears the
    /// editor when none remain.
    pub fn close(
        &mut self,
        project: &mut Project,
        target: &str,
        decision: Option<UnsavedDecision>,
    ) -> Result<CloseOutcome, ShellError> {
        let index = self.require(target)?;
        let normalized = self.tabs[index].path().to_string();
        if self.active.as_deref() == Some(normalized.as_str()) {
            self.sync_active();
        }

        if self.tabs[index].is_modified() {
            match decision {
                None => return Err(ShellError::UnsavedChanges(normalized)),
                Some(UnsavedDecision::Cancel) => return Ok(CloseOutcome::Cancelled),
                Some(UnsavedDecision::Save) => self.save(project, &normalized)?,
                Some(UnsavedDecision::Discard) => {}
            }
        }

        self.drop_tabs(|p| p == normalized);
        debug!(path = %normalized, "Closed tab");
        self.persist_session();
        Ok(CloseOutcome::Closed)
    }

    /// Write a tab's buffer into the tree and persist the project.
    ///
    /// The dirty flag clears only once storage accepted the write.
    pub fn save(&mut self, project: &mut Project, target: &str) -> Result<(), ShellError> {
        let index = self.require(target)?;
        if self.active.as_deref() == Some(self.tabs[index].path()) {
            self.sync_active();
        }
        let tab = &self.tabs[index];
        let saved_path = tab.path().to_string();
        project.update_file(&saved_path, tab.buffer())?;
        self.storage.save(keys::PROJECT, &project.to_stored())?;
        self.tabs[index].mark_saved();
        info!(path = %saved_path, "Saved file");
        self.persist_session();
        Ok(())
    }

    /// Save every dirty tab; stops at the first failure.
    pub fn save_all(&mut self, project: &mut Project) -> Result<usize, ShellError> {
        let dirty = self.dirty_paths();
        for p in &dirty {
            self.save(project, p)?;
        }
        Ok(dirty.len())
    }

    /// Record a new buffer for a tab and recompute its dirty flag.
    ///
    /// The active tab's buffer is also pushed to the editor, which stays the
    /// source the next save reads from.
    pub fn mark_modified(&mut self, target: &str, buffer: impl Into<String>) -> Result<bool, ShellError> {
        let index = self.require(target)?;
        let buffer = buffer.into();
        if self.active.as_deref() == Some(self.tabs[index].path()) {
            let language = self.tabs[index].language().to_string();
            self.editor.set_buffer(&buffer, &language);
        }
        if self.tabs[index].set_buffer(buffer) {
            self.persist_session();
        }
        Ok(self.tabs[index].is_modified())
    }

    /// Paths of tabs with unsaved edits, in tab order.
    pub fn dirty_paths(&mut self) -> Vec<String> {
        self.sync_active();
        self.tabs
            .iter()
            .filter(|t| t.is_modified())
            .map(|t| t.path().to_string())
            .collect()
    }

    /// Save the active tab if it has unsaved edits. Returns the saved path.
    pub fn auto_save(&mut self, project: &mut Project) -> Result<Option<String>, ShellError> {
        self.sync_active();
        let Some(active) = self.active_tab() else {
            return Ok(None);
        };
        if !active.is_modified() {
            return Ok(None);
        }
        let target = active.path().to_string();
        self.save(project, &target)?;
        Ok(Some(target))
    }

    /// Drain editor events, folding content changes into the active tab.
    pub fn pump_editor_events(&mut self) -> Vec<EditorEvent> {
        let events = self.editor.take_events();
        if events.contains(&EditorEvent::ContentChanged) {
            let buffer = self.editor.buffer();
            if let Some(active) = self.active.clone() {
                if let Some(index) = self.position(&active) {
                    if self.tabs[index].set_buffer(buffer) {
                        self.persist_session();
                    }
                }
            }
        }
        events
    }

    /// Re-key tabs after a rename or move of `from` (and its subtree) to `to`.
    pub fn relocate(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        let active_moved = self.active.as_deref().is_some_and(|a| path::is_within(a, from));
        if active_moved {
            self.sync_active();
        }
        let mut moved = 0;
        for tab in &mut self.tabs {
            if let Some(new_path) = path::rebase(tab.path(), from, to) {
                tab.relocate(new_path);
                moved += 1;
            }
        }
        if let Some(active) = self.active.take() {
            self.active = Some(path::rebase(&active, from, to).unwrap_or(active));
        }
        if active_moved {
            self.load_active();
        }
        if moved > 0 {
            debug!(from = %from, to = %to, tabs = moved, "Relocated tabs");
            self.persist_session();
        }
    }

    /// Close every tab at or under `removed` without prompting.
    ///
    /// Used when the backing nodes left the tree. Returns the closed paths.
    pub fn close_within(&mut self, removed: &str) -> Vec<String> {
        let closed: Vec<String> = self
            .tabs
            .iter()
            .filter(|t| path::is_within(t.path(), removed))
            .map(|t| t.path().to_string())
            .collect();
        if !closed.is_empty() {
            self.drop_tabs(|p| path::is_within(p, removed));
            debug!(path = %removed, tabs = closed.len(), "Closed tabs for removed nodes");
            self.persist_session();
        }
        closed
    }

    /// Close everything without prompting and clear the editor.
    pub fn reset(&mut self) {
        self.tabs.clear();
        self.active = None;
        self.editor.clear();
        self.persist_session();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            tabs: self.tabs.iter().map(Tab::to_record).collect(),
            active_tab_index: self.active.as_deref().and_then(|a| self.position(a)),
        }
    }

    /// Rebuild tabs from a stored session.
    ///
    /// Entries whose path no longer resolves to a file are dropped. A stored
    /// buffer that differs from the tree restores as a dirty tab.
    pub fn restore(&mut self, project: &Project, snapshot: SessionSnapshot) -> usize {
        self.tabs.clear();
        self.active = None;
        let wanted_active = snapshot
            .active_tab_index
            .and_then(|i| snapshot.tabs.get(i))
            .map(|r| path::normalize(&r.path));

        for record in snapshot.tabs {
            let normalized = path::normalize(&record.path);
            let Ok(file) = project.file(&normalized) else {
                debug!(path = %normalized, "Dropping stored tab with no backing file");
                continue;
            };
            if self.position(&normalized).is_some() {
                continue;
            }
            let mut tab = Tab::new(normalized, file.content.clone(), self.next_seq);
            self.next_seq += 1;
            tab.set_buffer(record.content);
            self.tabs.push(tab);
        }

        self.active = match wanted_active {
            Some(p) if self.position(&p).is_some() => Some(p),
            _ => self.most_recent(),
        };
        self.load_active();
        info!(tabs = self.tabs.len(), "Restored tab session");
        self.tabs.len()
    }

    /// Restore the session stored under the tabs key, if any.
    pub fn restore_from_storage(&mut self, project: &Project) -> usize {
        let snapshot: SessionSnapshot = self.storage.load_or_default(keys::TABS_SESSION);
        self.restore(project, snapshot)
    }

    /// Persist the tab session. Failures are logged, not surfaced.
    pub fn persist_session(&self) {
        if let Err(e) = self.storage.save(keys::TABS_SESSION, &self.snapshot()) {
            warn!(error = %e, "Failed to persist tab session");
        }
    }

    fn sync_active(&mut self) {
        let Some(active) = self.active.clone() else {
            return;
        };
        if let Some(index) = self.position(&active) {
            let buffer = self.editor.buffer();
            self.tabs[index].set_buffer(buffer);
        }
    }

    fn leave_active(&mut self, project: &mut Project, mode: SwitchMode) -> Result<(), ShellError> {
        let Some(active) = self.active.clone() else {
            return Ok(());
        };
        let Some(index) = self.position(&active) else {
            return Ok(());
        };
        match mode {
            SwitchMode::Flush => {
                self.sync_active();
                if self.tabs[index].is_modified() {
                    self.save(project, &active)?;
                }
            }
            SwitchMode::Discard => self.tabs[index].revert(),
        }
        Ok(())
    }

    fn load_active(&mut self) {
        match self.active.as_deref().and_then(|a| self.position(a)) {
            Some(index) => {
                let tab = &self.tabs[index];
                self.editor.set_buffer(tab.buffer(), tab.language());
            }
            None => {
                self.active = None;
                self.editor.clear();
            }
        }
    }

    fn most_recent(&self) -> Option<String> {
        self.tabs
            .iter()
            .max_by_key(|t| t.opened_seq())
            .map(|t| t.path().to_string())
    }

    /// Remove matching tabs; if the active one goes, fall back to the most
    /// recently opened survivor.
    fn drop_tabs(&mut self, matches: impl Fn(&str) -> bool) {
        self.tabs.retain(|t| !matches(t.path()));
        let active_gone = self.active.as_deref().is_some_and(|a| matches(a));
        if active_gone {
            self.active = self.most_recent();
            self.load_active();
        }
    }
}

impl std::fmt::Debug for TabManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabManager")
            .field("tabs", &self.tabs)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
