//! Rope-backed text storage for the in-memory surface.

use ropey::Rope;
use std::ops::Range;

/// Rope-backed content buffer with a revision counter.
#[derive(Clone, Debug, Default)]
pub struct RopeBuffer {
    rope: Rope,
    revision: u64,
}

impl RopeBuffer {
    /// Create a new buffer from UTF-8 text.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            revision: 0,
        }
    }

    /// Returns the number of mutations applied since creation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the content length in characters.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns a UTF-8 copy of the whole buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Returns a UTF-8 copy of the given char range, clamped to the buffer.
    pub fn slice_chars(&self, range: Range<usize>) -> String {
        let len = self.len_chars();
        let start = range.start.min(len);
        let end = range.end.min(len);
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    /// Replace a char range with new text.
    ///
    /// # Returns
    /// `false` when the call is a no-op (empty range and empty replacement).
    pub fn replace_char_range(&mut self, range: Range<usize>, text: &str) -> bool {
        let len = self.len_chars();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        if start == end && text.is_empty() {
            return false;
        }
        if start < end {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
        self.revision = self.revision.wrapping_add(1);
        true
    }
}
