//! In-memory [`TextSurface`] adapter.

use crate::buffer::RopeBuffer;
use crate::surface::{selection_after_replace, SelectionPolicy, TextSurface};
use std::ops::Range;

/// Headless text surface backed by a rope.
///
/// Used by tests and the replay tool; GUI hosts provide their own adapter.
#[derive(Clone, Debug, Default)]
pub struct MemorySurface {
    buffer: RopeBuffer,
    selection: Range<usize>,
    focus_requests: usize,
}

impl MemorySurface {
    /// Surface holding `text` with the caret at the end.
    pub fn new(text: &str) -> Self {
        let buffer = RopeBuffer::new(text);
        let end = buffer.len_chars();
        Self {
            buffer,
            selection: end..end,
            focus_requests: 0,
        }
    }

    /// Surface holding `text` with `selection` applied (clamped).
    pub fn with_selection(text: &str, selection: Range<usize>) -> Self {
        let mut surface = Self::new(text);
        surface.set_selection(selection);
        surface
    }

    /// Number of mutations applied to the underlying buffer.
    pub fn revision(&self) -> u64 {
        self.buffer.revision()
    }

    /// How many times the engine handed focus back to the surface.
    pub fn focus_requests(&self) -> usize {
        self.focus_requests
    }

    /// Selected text, empty for a caret.
    pub fn selected_text(&self) -> String {
        self.buffer.slice_chars(self.selection.clone())
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let len = self.buffer.len_chars();
        let (a, b) = (range.start.min(len), range.end.min(len));
        a.min(b)..a.max(b)
    }
}

impl TextSurface for MemorySurface {
    fn text(&self) -> String {
        self.buffer.text()
    }

    fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    fn replace_range(&mut self, range: Range<usize>, text: &str, policy: SelectionPolicy) {
        let range = self.clamp(range);
        let inserted = text.chars().count();
        let next =
            selection_after_replace(self.selection.clone(), range.clone(), inserted, policy);
        self.buffer.replace_char_range(range, text);
        self.selection = self.clamp(next);
    }

    fn set_selection(&mut self, selection: Range<usize>) {
        self.selection = self.clamp(selection);
    }

    fn focus(&mut self) {
        self.focus_requests = self.focus_requests.saturating_add(1);
    }
}
