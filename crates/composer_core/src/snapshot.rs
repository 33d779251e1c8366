//! Immutable text + selection snapshots recorded by the undo history.

use crate::error::ComposerError;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One point in editing history: the full text plus the selection on top of it.
///
/// Offsets are char (Unicode scalar) indices and always satisfy
/// `selection_start <= selection_end <= text.chars().count()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot")]
pub struct Snapshot {
    text: String,
    selection_start: usize,
    selection_end: usize,
}

#[derive(Deserialize)]
struct RawSnapshot {
    text: String,
    selection_start: usize,
    selection_end: usize,
}

impl TryFrom<RawSnapshot> for Snapshot {
    type Error = ComposerError;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        Self::new(raw.text, raw.selection_start, raw.selection_end)
    }
}

impl Snapshot {
    /// Build a snapshot from untrusted offsets.
    ///
    /// # Errors
    /// Returns [`ComposerError::InvalidSelection`] when the range is reversed or
    /// extends past the end of `text`.
    pub fn new(
        text: impl Into<String>,
        selection_start: usize,
        selection_end: usize,
    ) -> Result<Self, ComposerError> {
        let text = text.into();
        let len = text.chars().count();
        if selection_start > selection_end || selection_end > len {
            return Err(ComposerError::InvalidSelection {
                start: selection_start,
                end: selection_end,
                len,
            });
        }
        Ok(Self {
            text,
            selection_start,
            selection_end,
        })
    }

    /// Build a snapshot from live surface state, ordering and clamping the range.
    pub fn capture(text: impl Into<String>, selection: Range<usize>) -> Self {
        let text = text.into();
        let len = text.chars().count();
        let (a, b) = (selection.start.min(len), selection.end.min(len));
        Self {
            text,
            selection_start: a.min(b),
            selection_end: a.max(b),
        }
    }

    /// Snapshot of `text` with a collapsed caret at `caret`.
    pub fn caret(text: impl Into<String>, caret: usize) -> Self {
        Self::capture(text, caret..caret)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection_start(&self) -> usize {
        self.selection_start
    }

    pub fn selection_end(&self) -> usize {
        self.selection_end
    }

    /// Selection as a half-open char range.
    pub fn selection(&self) -> Range<usize> {
        self.selection_start..self.selection_end
    }

    /// True when the selection is a caret.
    pub fn is_collapsed(&self) -> bool {
        self.selection_start == self.selection_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_out_of_bounds_and_reversed_ranges() {
        assert_eq!(
            Snapshot::new("abc", 1, 4),
            Err(ComposerError::InvalidSelection {
                start: 1,
                end: 4,
                len: 3
            })
        );
        assert!(Snapshot::new("abc", 2, 1).is_err());
        assert!(Snapshot::new("abc", 3, 3).is_ok());
    }

    #[test]
    fn offsets_count_chars_not_bytes() {
        let snapshot = Snapshot::new("日本語", 1, 3).expect("snapshot");
        assert_eq!(snapshot.selection(), 1..3);
    }

    #[test]
    fn capture_normalizes_direction_and_clamps() {
        let snapshot = Snapshot::capture("hello", 9..2);
        assert_eq!(snapshot.selection(), 2..5);
        assert!(!snapshot.is_collapsed());
    }

    #[test]
    fn deserialization_validates_selection() {
        let ok: Snapshot =
            serde_json::from_str(r#"{"text":"ab","selection_start":0,"selection_end":2}"#)
                .expect("valid snapshot");
        assert_eq!(ok.text(), "ab");
        let bad = serde_json::from_str::<Snapshot>(
            r#"{"text":"ab","selection_start":0,"selection_end":5}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(Snapshot::caret("ab", 1), Snapshot::capture("ab", 1..1));
        assert_ne!(Snapshot::caret("ab", 1), Snapshot::caret("ab", 2));
    }
}
