//! Form state: text fields, focus and client-side validation.
//!
//! Forms are plain data. Submission is driven by [`crate::App`], which turns
//! a valid form into an [`crate::AppAction`] and marks it pending until the
//! matching completion arrives.

mod login;
mod message;
mod recharge;
mod signup;

pub use login::{LoginField, LoginForm};
pub use message::{MessageField, SendMessageForm};
pub use recharge::RechargeForm;
pub use signup::{SignupField, SignupForm};

use crate::KeyInput;

/// Single-line text buffer with a cursor.
///
/// The cursor is a character index, so multi-byte input edits correctly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    cursor: usize,
}

impl TextField {
    /// Create an empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True if the field holds no text.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace contents, cursor at end.
    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
    }

    /// Empty the field.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Insert a character at the cursor.
    pub fn insert(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.value.remove(at);
        true
    }

    /// Delete the character at the cursor.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.value.chars().count() {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.value.remove(at);
        true
    }

    /// Apply an editing key. Returns true if the contents changed.
    ///
    /// Keys that are not editing keys are ignored.
    pub fn apply(&mut self, key: KeyInput) -> bool {
        self.apply_filtered(key, |_| true)
    }

    /// Like [`TextField::apply`], but only characters accepted by `allow`
    /// are inserted.
    pub fn apply_filtered(&mut self, key: KeyInput, allow: impl Fn(char) -> bool) -> bool {
        let len = self.value.chars().count();
        match key {
            KeyInput::Char(c) if allow(c) => {
                self.insert(c);
                true
            },
            KeyInput::Backspace => self.backspace(),
            KeyInput::Delete => self.delete(),
            KeyInput::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            },
            KeyInput::Right => {
                self.cursor = (self.cursor + 1).min(len);
                false
            },
            KeyInput::Home => {
                self.cursor = 0;
                false
            },
            KeyInput::End => {
                self.cursor = len;
                false
            },
            _ => false,
        }
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.value.char_indices().nth(chars).map_or(self.value.len(), |(i, _)| i)
    }
}
