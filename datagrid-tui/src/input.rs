//! One-line input used by the search box and the text cell editor.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key did to a [`LineInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEdit {
    Changed,
    Moved,
    Submitted,
    Ignored,
}

/// Text plus a cursor, counted in chars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInput {
    text: String,
    cursor: usize,
}

impl LineInput {
    /// Creates an input with the cursor after the last char.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> LineEdit {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return LineEdit::Ignored;
        }

        match key.code {
            KeyCode::Char(c) => {
                self.insert_char(c);
                LineEdit::Changed
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.text.remove(self.byte_index(self.cursor));
                LineEdit::Changed
            }
            KeyCode::Delete if self.cursor < self.len() => {
                self.text.remove(self.byte_index(self.cursor));
                LineEdit::Changed
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                LineEdit::Moved
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.len());
                LineEdit::Moved
            }
            KeyCode::Home => {
                self.cursor = 0;
                LineEdit::Moved
            }
            KeyCode::End => {
                self.cursor = self.len();
                LineEdit::Moved
            }
            KeyCode::Enter => LineEdit::Submitted,
            _ => LineEdit::Ignored,
        }
    }

    fn insert_char(&mut self, c: char) {
        self.text.insert(self.byte_index(self.cursor), c);
        self.cursor += 1;
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.text
            .char_indices()
            .nth(cursor)
            .map_or(self.text.len(), |(i, _)| i)
    }
}
