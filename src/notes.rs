//! Notes panel model.

use crate::error::{ShellError, StorageError};
use crate::store::{keys, Storage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub id: u64,
    pub title: String,
    pub content: String,
    /// Creation or last edit time
    pub date: DateTime<Utc>,
}

/// Ordered note list, persisted after every change
#[derive(Debug, Clone)]
pub struct NoteBook {
    notes: Vec<Note>,
    storage: Storage,
}

impl NoteBook {
    pub fn load(storage: Storage) -> Self {
        let mut notes: Vec<Note> = storage.load_or_default(keys::NOTES);
        // entries written before ids existed all read as 0
        let mut next = notes.iter().map(|n| n.id).max().unwrap_or(0);
        let mut seen = std::collections::HashSet::new();
        for note in &mut notes {
            if note.id == 0 || !seen.insert(note.id) {
                next += 1;
                note.id = next;
                seen.insert(next);
            }
        }
        Self { notes, storage }
    }

    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: u64) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Add a note. Title and content must be non-empty.
    pub fn add(&mut self, title: &str, content: &str) -> Result<&Note, ShellError> {
        validate(title, content)?;
        let id = self.notes.iter().map(|n| n.id).max().unwrap_or(0) + 1;
        self.notes.push(Note {
            id,
            title: title.to_string(),
            content: content.to_string(),
            date: Utc::now(),
        });
        self.persist()?;
        let index = self.notes.len() - 1;
        Ok(&self.notes[index])
    }

    /// Replace a note's title and content and refresh its date.
    pub fn edit(&mut self, id: u64, title: &str, content: &str) -> Result<(), ShellError> {
        validate(title, content)?;
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| ShellError::NotFound(format!("note {}", id)))?;
        note.title = title.to_string();
        note.content = content.to_string();
        note.date = Utc::now();
        self.persist()?;
        Ok(())
    }

    pub fn delete(&mut self, id: u64) -> Result<Note, ShellError> {
        let index = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| ShellError::NotFound(format!("note {}", id)))?;
        let removed = self.notes.remove(index);
        self.persist()?;
        Ok(removed)
    }

    fn persist(&self) -> Result<(), StorageError> {
        self.storage.save(keys::NOTES, &self.notes)
    }
}

fn validate(title: &str, content: &str) -> Result<(), ShellError> {
    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(ShellError::Validation(
            "note title and content must not be empty".to_string(),
        ));
    }
    Ok(())
}
