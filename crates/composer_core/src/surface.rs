//! Host text surface port.
//!
//! The engine never touches a native widget directly. Each host (a GUI text
//! field, a terminal line editor, the in-memory [`MemorySurface`](crate::MemorySurface))
//! implements [`TextSurface`], and every read and write goes through it.

use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// How the selection is repositioned after [`TextSurface::replace_range`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Keep the selection anchored to the surrounding text.
    Preserve,
    /// Collapse to the start of the replaced range.
    CollapseToStart,
    /// Collapse to the end of the inserted text.
    CollapseToEnd,
}

/// Editable text surface owned by the host.
///
/// Offsets are char indices. Implementations clamp out-of-range offsets
/// instead of failing.
pub trait TextSurface {
    /// Current full text.
    fn text(&self) -> String;

    /// Current selection; `start == end` for a caret.
    fn selection(&self) -> Range<usize>;

    /// Replace `range` with `text` and move the selection per `policy`.
    fn replace_range(&mut self, range: Range<usize>, text: &str, policy: SelectionPolicy);

    /// Select an arbitrary range.
    fn set_selection(&mut self, selection: Range<usize>);

    /// Return input focus to the surface.
    fn focus(&mut self);

    /// Capture the current text and selection.
    fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.text(), self.selection())
    }
}

impl<S: TextSurface + ?Sized> TextSurface for &mut S {
    fn text(&self) -> String {
        (**self).text()
    }

    fn selection(&self) -> Range<usize> {
        (**self).selection()
    }

    fn replace_range(&mut self, range: Range<usize>, text: &str, policy: SelectionPolicy) {
        (**self).replace_range(range, text, policy)
    }

    fn set_selection(&mut self, selection: Range<usize>) {
        (**self).set_selection(selection)
    }

    fn focus(&mut self) {
        (**self).focus()
    }
}

/// Selection after replacing `range` with `inserted_chars` characters.
///
/// Follows the textarea `setRangeText` rules: offsets after the replaced range
/// shift by the length delta, offsets strictly inside it snap to its start
/// (selection start) or to the end of the inserted text (selection end).
pub fn selection_after_replace(
    selection: Range<usize>,
    range: Range<usize>,
    inserted_chars: usize,
    policy: SelectionPolicy,
) -> Range<usize> {
    let new_end = range.start + inserted_chars;
    match policy {
        SelectionPolicy::CollapseToStart => range.start..range.start,
        SelectionPolicy::CollapseToEnd => new_end..new_end,
        SelectionPolicy::Preserve => {
            let shift = |offset: usize, inside: usize| {
                if offset > range.end {
                    offset - range.end + new_end
                } else if offset > range.start {
                    inside
                } else {
                    offset
                }
            };
            let start = shift(selection.start, range.start);
            let end = shift(selection.end, new_end);
            start.min(end)..end.max(start)
        }
    }
}
