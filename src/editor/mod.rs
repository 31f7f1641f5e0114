//! Editor adapter
//!
//! The text-editing widget is an external collaborator. The shell drives it
//! only through [`EditorAdapter`]: load a buffer with a language, read the
//! buffer back, push display options, and drain content/cursor events.

pub mod headless;
pub mod language;

use serde::{Deserialize, Serialize};

pub use headless::HeadlessEditor;
pub use language::{language_for_path, language_label};

/// Display options pushed to the widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorOptions {
    pub theme: String,
    pub font_size: u16,
    pub word_wrap: bool,
    pub tab_size: u8,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            theme: "vs-dark".to_string(),
            font_size: 14,
            word_wrap: false,
            tab_size: 4,
        }
    }
}

/// Notification raised by the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    /// The user changed the buffer text
    ContentChanged,
    /// Cursor moved; 1-based line and column
    CursorChanged { line: usize, column: usize },
}

/// Narrow interface to the editing widget
pub trait EditorAdapter: Send {
    /// Replace the whole buffer. Programmatic loads do not raise
    /// `ContentChanged`.
    fn set_buffer(&mut self, text: &str, language: &str);

    fn buffer(&self) -> String;

    fn language(&self) -> String;

    /// Show the empty state (no open tabs).
    fn clear(&mut self);

    fn set_theme(&mut self, theme: &str);
    fn set_font_size(&mut self, size: u16);
    fn set_word_wrap(&mut self, wrap: bool);
    fn set_tab_size(&mut self, size: u8);

    /// Events raised since the last call, oldest first.
    fn take_events(&mut self) -> Vec<EditorEvent>;

    fn apply_options(&mut self, options: &EditorOptions) {
        self.set_theme(&options.theme);
        self.set_font_size(options.font_size);
        self.set_word_wrap(options.word_wrap);
        self.set_tab_size(options.tab_size);
    }
}
