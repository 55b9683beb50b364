// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The basic line editor used for every prompt.
//!
//! It is used for entering a new label, a new timeout, and for confirming a reboot. The cursor can be moved
//! with the arrow keys, Home and End. Enter submits the value, and ESC cancels the prompt.

use ratatui_crossterm::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

mod widget;

/// What the user did with the prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorOutcome {
    /// The prompt is still open.
    Editing,

    /// The value was submitted.
    Submitted,

    /// The prompt was cancelled.
    Cancelled,
}

/// The basic editor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineEditor {
    /// The question shown above the value.
    pub title: String,

    /// The value being edited.
    pub value: String,

    /// Tracks the current position of the cursor, in characters.
    pub cursor_pos: usize,
}

impl LineEditor {
    /// Creates a new [`LineEditor`] with the cursor after the initial value.
    #[must_use = "Has no effect if the result is unused"]
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            title: title.into(),
            cursor_pos: value.chars().count(),
            value,
        }
    }

    /// Handle a key that was pressed.
    ///
    /// If the key is a backspace or delete, then the character before or under the cursor is removed.
    /// If the key is left, right, home or end, then the cursor position is moved.
    /// If the key is anything else that is printable, then that key will be inserted at the cursor.
    pub fn handle_key(&mut self, key: KeyEvent) -> EditorOutcome {
        match key.code {
            KeyCode::Enter => return EditorOutcome::Submitted,
            KeyCode::Esc => return EditorOutcome::Cancelled,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return EditorOutcome::Cancelled;
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.clear();
                self.cursor_pos = 0;
            }
            KeyCode::Backspace => {
                if self.cursor_pos > 0 {
                    self.cursor_pos -= 1;
                    let idx = self.byte_index(self.cursor_pos);
                    self.value.remove(idx);
                }
            }
            KeyCode::Delete => {
                if self.cursor_pos < self.chars() {
                    let idx = self.byte_index(self.cursor_pos);
                    self.value.remove(idx);
                }
            }
            KeyCode::Left => self.cursor_pos = self.cursor_pos.saturating_sub(1),
            KeyCode::Right => self.cursor_pos = (self.cursor_pos + 1).min(self.chars()),
            KeyCode::Home => self.cursor_pos = 0,
            KeyCode::End => self.cursor_pos = self.chars(),
            KeyCode::Char(c) if !c.is_control() => {
                let idx = self.byte_index(self.cursor_pos);
                self.value.insert(idx, c);
                self.cursor_pos += 1;
            }
            _ => (),
        }
        EditorOutcome::Editing
    }

    /// Returns the number of characters in the value.
    #[must_use = "Has no effect if the result is unused"]
    pub fn chars(&self) -> usize {
        self.value.chars().count()
    }

    /// Converts a position in characters to a position in bytes.
    fn byte_index(&self, pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(pos)
            .map_or(self.value.len(), |(idx, _)| idx)
    }
}
