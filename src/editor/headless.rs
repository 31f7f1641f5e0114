//! In-process editor used by the CLI and tests.

use super::{EditorAdapter, EditorEvent, EditorOptions};
use std::collections::VecDeque;

/// Editor widget stand-in that keeps its buffer in memory.
///
/// `type_text`, `replace_text` and `move_cursor` simulate user input and
/// queue the matching events.
#[derive(Debug, Default)]
pub struct HeadlessEditor {
    text: String,
    language: String,
    options: EditorOptions,
    cursor: (usize, usize),
    visible: bool,
    events: VecDeque<EditorEvent>,
}

impl HeadlessEditor {
    pub fn new() -> Self {
        Self {
            language: "plaintext".to_string(),
            cursor: (1, 1),
            ..Default::default()
        }
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// True while a buffer is loaded (false in the empty state)
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// Append text at the end of the buffer as if typed.
    pub fn type_text(&mut self, text: &str) {
        self.text.push_str(text);
        self.events.push_back(EditorEvent::ContentChanged);
        self.move_to_end();
    }

    /// Replace the whole buffer as if the user edited it.
    pub fn replace_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.events.push_back(EditorEvent::ContentChanged);
        self.move_to_end();
    }

    pub fn move_cursor(&mut self, line: usize, column: usize) {
        self.cursor = (line.max(1), column.max(1));
        self.events.push_back(EditorEvent::CursorChanged {
            line: self.cursor.0,
            column: self.cursor.1,
        });
    }

    fn move_to_end(&mut self) {
        let line = self.text.split('\n').count().max(1);
        let column = self.text.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
        self.move_cursor(line, column);
    }
}

impl EditorAdapter for HeadlessEditor {
    fn set_buffer(&mut self, text: &str, language: &str) {
        self.text = text.to_string();
        self.language = language.to_string();
        self.cursor = (1, 1);
        self.visible = true;
    }

    fn buffer(&self) -> String {
        self.text.clone()
    }

    fn language(&self) -> String {
        self.language.clone()
    }

    fn clear(&mut self) {
        self.text.clear();
        self.language = "plaintext".to_string();
        self.cursor = (1, 1);
        self.visible = false;
    }

    fn set_theme(&mut self, theme: &str) {
        self.options.theme = theme.to_string();
    }

    fn set_font_size(&mut self, size: u16) {
        self.options.font_size = size;
    }

    fn set_word_wrap(&mut self, wrap: bool) {
        self.options.word_wrap = wrap;
    }

    fn set_tab_size(&mut self, size: u8) {
        self.options.tab_size = size;
    }

    fn take_events(&mut self) -> Vec<EditorEvent> {
        self.events.drain(..).collect()
    }
}
