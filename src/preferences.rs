//! User preferences
//!
//! Stored values are merged over [`Preferences::default`] key by key, so a
//! partial or older object keeps every setting it does not mention.

use crate::editor::EditorOptions;
use crate::error::{ShellError, StorageError};
use crate::store::{keys, Storage};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordWrap {
    #[default]
    Off,
    On,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineNumbers {
    #[default]
    On,
    Off,
    Relative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: String,
    pub font_size: u16,
    pub font_family: String,
    pub tab_size: u8,
    pub insert_spaces: bool,
    pub word_wrap: WordWrap,
    pub line_numbers: LineNumbers,
    pub minimap: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: "vs-dark".to_string(),
            font_size: 14,
            font_family: "Consolas, \"Courier New\", monospace".to_string(),
            tab_size: 4,
            insert_spaces: true,
            word_wrap: WordWrap::Off,
            line_numbers: LineNumbers::On,
            minimap: true,
        }
    }
}

impl Preferences {
    /// Load stored preferences merged over the defaults.
    ///
    /// Older layouts that nest settings under `editor` are flattened. A
    /// value that still fails to parse is logged and ignored.
    pub fn load(storage: &Storage) -> Self {
        let stored = match storage.load::<Value>(keys::PREFERENCES) {
            Ok(Some(value)) => value,
            Ok(None) => return Self::default(),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable preferences");
                return Self::default();
            }
        };
        Self::merged(stored).unwrap_or_else(|e| {
            warn!(error = %e, "Stored preferences are invalid; using defaults");
            Self::default()
        })
    }

    pub fn save(&self, storage: &Storage) -> Result<(), StorageError> {
        storage.save(keys::PREFERENCES, self)
    }

    /// Defaults with `overlay` applied on top.
    pub fn merged(overlay: Value) -> Result<Self, serde_json::Error> {
        let mut base = serde_json::to_value(Self::default())?;
        merge_object(&mut base, flatten_legacy(overlay));
        serde_json::from_value(base)
    }

    /// Set one preference by its stored key (`fontSize`, `theme`, ...).
    ///
    /// `value` is read as JSON when possible, else as a plain string.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ShellError> {
        let parsed = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        let mut current = serde_json::to_value(&*self).map_err(StorageError::from)?;
        match current.as_object_mut() {
            Some(fields) if fields.contains_key(key) => {
                fields.insert(key.to_string(), parsed);
            }
            _ => return Err(ShellError::ConfigError(format!("Unknown preference: {}", key))),
        }
        *self = serde_json::from_value(current)
            .map_err(|e| ShellError::ConfigError(format!("Invalid value for {}: {}", key, e)))?;
        Ok(())
    }

    pub fn editor_options(&self) -> EditorOptions {
        EditorOptions {
            theme: self.theme.clone(),
            font_size: self.font_size,
            word_wrap: self.word_wrap == WordWrap::On,
            tab_size: self.tab_size,
        }
    }
}

fn flatten_legacy(overlay: Value) -> Value {
    let Value::Object(mut fields) = overlay else {
        return overlay;
    };
    if let Some(Value::Object(editor)) = fields.remove("editor") {
        for (key, value) in editor {
            fields.entry(key).or_insert(value);
        }
    }
    Value::Object(fields)
}

/// Overlay known keys of `overlay` onto `base`; unknown keys are dropped.
fn merge_object(base: &mut Value, overlay: Value) {
    let (Value::Object(base_fields), Value::Object(overlay_fields)) = (base, overlay) else {
        return;
    };
    for (key, value) in overlay_fields {
        if let Some(slot) = base_fields.get_mut(&key) {
            if slot.is_object() && value.is_object() {
                merge_object(slot, value);
            } else {
                *slot = value;
            }
        }
    }
}
