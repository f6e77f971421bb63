//! Single-line text editing shared by the picker input and the prompts.

use std::ops::Range;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A line buffer with a cursor and an optional selection.
///
/// Positions are byte offsets that always sit on `char` boundaries.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    buffer: String,
    cursor: usize,
    /// Selected byte range; typing replaces it.
    selection: Option<Range<usize>>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `value`, the cursor at the end.
    pub fn with_initial(value: &str) -> Self {
        Self {
            buffer: value.to_string(),
            cursor: value.len(),
            selection: None,
        }
    }

    /// Select `range` of the buffer. Out-of-range or non-boundary ends are
    /// clamped.
    pub fn with_selection(mut self, range: Range<usize>) -> Self {
        let start = self.clamp(range.start);
        let end = self.clamp(range.end.max(range.start));
        if start < end {
            self.selection = Some(start..end);
            self.cursor = end;
        }
        self
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selection(&self) -> Option<Range<usize>> {
        self.selection.clone()
    }

    /// Replace the whole buffer, dropping the selection.
    pub fn set(&mut self, value: &str) {
        self.buffer = value.to_string();
        self.cursor = self.buffer.len();
        self.selection = None;
    }

    fn clamp(&self, mut pos: usize) -> usize {
        pos = pos.min(self.buffer.len());
        while !self.buffer.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    fn next_boundary(&self) -> usize {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map_or(self.cursor, |c| self.cursor + c.len_utf8())
    }

    /// Remove the selection if there is one. Returns `true` when text was
    /// removed.
    fn delete_selection(&mut self) -> bool {
        match self.selection.take() {
            Some(range) if !range.is_empty() => {
                self.cursor = range.start;
                self.buffer.replace_range(range, "");
                true
            }
            _ => false,
        }
    }

    /// Handle a key event.
    pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
        let before = self.buffer.clone();
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => return InputResult::Submit(self.buffer.clone()),
            (KeyCode::Esc, _) => return InputResult::Cancel,

            (KeyCode::Backspace, _) => {
                if !self.delete_selection() && self.cursor > 0 {
                    let start = self.prev_boundary();
                    self.buffer.replace_range(start..self.cursor, "");
                    self.cursor = start;
                }
            }
            (KeyCode::Delete, _) => {
                if !self.delete_selection() && self.cursor < self.buffer.len() {
                    let end = self.next_boundary();
                    self.buffer.replace_range(self.cursor..end, "");
                }
            }

            (KeyCode::Left, _) => {
                match self.selection.take() {
                    Some(range) => self.cursor = range.start,
                    None => self.cursor = self.prev_boundary(),
                }
            }
            (KeyCode::Right, _) => {
                match self.selection.take() {
                    Some(range) => self.cursor = range.end,
                    None => self.cursor = self.next_boundary(),
                }
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.selection = None;
                self.cursor = 0;
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.selection = None;
                self.cursor = self.buffer.len();
            }

            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.selection = None;
                self.buffer.clear();
                self.cursor = 0;
            }
            (KeyCode::Char('k'), KeyModifiers::CONTROL) => {
                self.selection = None;
                self.buffer.truncate(self.cursor);
            }

            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.delete_selection();
                self.buffer.insert(self.cursor, c);
                self.cursor += c.len_utf8();
            }

            _ => {}
        }

        if self.buffer == before {
            InputResult::Continue
        } else {
            InputResult::Changed
        }
    }
}

/// Result of handling a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
    /// Nothing the caller needs to react to.
    Continue,
    /// The buffer changed.
    Changed,
    Cancel,
    Submit(String),
}
