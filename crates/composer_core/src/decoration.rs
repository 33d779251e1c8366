//! Inline markdown decoration toggling (bold, italic, strikethrough).

use crate::error::ComposerError;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::str::FromStr;

/// Inline decoration marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Bold,
    Italic,
    Strikethrough,
}

impl Marker {
    /// Literal token written around decorated text.
    pub fn token(self) -> &'static str {
        match self {
            Self::Bold => "**",
            Self::Italic => "_",
            Self::Strikethrough => "~~",
        }
    }

    /// Token length in chars.
    pub fn width(self) -> usize {
        self.token().len()
    }

    /// Marker bound to a Ctrl/Cmd shortcut letter, case-insensitive.
    pub fn from_shortcut(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'b' => Some(Self::Bold),
            'i' => Some(Self::Italic),
            's' => Some(Self::Strikethrough),
            _ => None,
        }
    }
}

impl FromStr for Marker {
    type Err = ComposerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bold" | "**" => Ok(Self::Bold),
            "italic" | "_" => Ok(Self::Italic),
            "strikethrough" | "strike" | "~~" => Ok(Self::Strikethrough),
            _ => Err(ComposerError::UnknownMarker(value.to_string())),
        }
    }
}

/// Where a marker pair sits relative to a range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecorationPosition {
    /// The range itself starts and ends with the marker.
    Inside,
    /// The marker sits immediately before and after the range.
    Outside,
    None,
}

/// Replacement computed by [`toggle`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecorationEdit {
    /// Char range to replace in the pre-edit text.
    pub range: Range<usize>,
    pub replacement: String,
    /// Selection to apply after the replacement.
    pub selection: Range<usize>,
}

fn matches_at(chars: &[char], at: usize, token: &str) -> bool {
    let mut index = at;
    for expected in token.chars() {
        if chars.get(index) != Some(&expected) {
            return false;
        }
        index += 1;
    }
    true
}

/// Bounds of the non-whitespace run touching `caret`.
fn word_bounds(chars: &[char], caret: usize) -> Range<usize> {
    let caret = caret.min(chars.len());
    let mut left = caret;
    while left > 0 && !chars[left - 1].is_whitespace() {
        left -= 1;
    }
    let mut right = caret;
    while right < chars.len() && !chars[right].is_whitespace() {
        right += 1;
    }
    left..right
}

/// Classify `range` of `chars` against `marker`.
pub fn classify(chars: &[char], range: Range<usize>, marker: Marker) -> DecorationPosition {
    let token = marker.token();
    let len = marker.width();
    let selected = range.end.saturating_sub(range.start);
    if selected >= 2 * len
        && matches_at(chars, range.start, token)
        && matches_at(chars, range.end - len, token)
    {
        return DecorationPosition::Inside;
    }
    if range.start >= len
        && range.end + len <= chars.len()
        && matches_at(chars, range.start - len, token)
        && matches_at(chars, range.end, token)
    {
        return DecorationPosition::Outside;
    }
    DecorationPosition::None
}

/// Compute the edit that toggles `marker` for the given selection.
///
/// A caret inside a word acts on the whole word and keeps its offset within
/// the word; a caret touching no word inserts an empty marker pair around it.
/// Applying the returned edit twice restores the original text and selection
/// for selections and for carets strictly inside a word. A caret on the outer
/// edge of a decorated word moves back by the marker width after removal, so
/// it can land in the neighbouring word and a second toggle decorates that one.
pub fn toggle(marker: Marker, text: &str, selection: Range<usize>) -> DecorationEdit {
    let chars: Vec<char> = text.chars().collect();
    let start = selection.start.min(chars.len());
    let end = selection.end.min(chars.len()).max(start);
    let token = marker.token();
    let len = marker.width();

    let (working, keep_caret) = if start == end {
        let word = word_bounds(&chars, start);
        if word.is_empty() {
            let caret = start + len;
            return DecorationEdit {
                range: start..start,
                replacement: format!("{token}{token}"),
                selection: caret..caret,
            };
        }
        (word, true)
    } else {
        (start..end, false)
    };

    let selected: String = chars[working.clone()].iter().collect();
    match classify(&chars, working.clone(), marker) {
        DecorationPosition::Inside => {
            let inner: String = chars[working.start + len..working.end - len].iter().collect();
            let selection = if keep_caret {
                start.saturating_sub(len)..end.saturating_sub(len)
            } else {
                start..end.saturating_sub(2 * len)
            };
            DecorationEdit {
                range: working,
                replacement: inner,
                selection,
            }
        }
        DecorationPosition::Outside => DecorationEdit {
            range: working.start - len..working.end + len,
            replacement: selected,
            selection: start.saturating_sub(len)..end.saturating_sub(len),
        },
        DecorationPosition::None => DecorationEdit {
            range: working,
            replacement: format!("{token}{selected}{token}"),
            selection: start + len..end + len,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(text: &str, edit: &DecorationEdit) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut out: String = chars[..edit.range.start].iter().collect();
        out.push_str(&edit.replacement);
        out.extend(chars[edit.range.end..].iter());
        out
    }

    fn toggle_twice(marker: Marker, text: &str, selection: Range<usize>) {
        let first = toggle(marker, text, selection.clone());
        let decorated = apply(text, &first);
        let second = toggle(marker, &decorated, first.selection.clone());
        assert_eq!(apply(&decorated, &second), text, "text after double toggle");
        assert_eq!(second.selection, selection, "selection after double toggle");
    }

    #[test]
    fn wraps_plain_selection_and_keeps_it_selected() {
        let edit = toggle(Marker::Bold, "foo hello bar", 4..9);
        assert_eq!(apply("foo hello bar", &edit), "foo **hello** bar");
        assert_eq!(edit.selection, 6..11);
    }

    #[test]
    fn removes_markers_outside_selection() {
        let text = "foo **hello** bar";
        let edit = toggle(Marker::Bold, text, 6..11);
        assert_eq!(edit.range, 4..13);
        assert_eq!(apply(text, &edit), "foo hello bar");
        assert_eq!(edit.selection, 4..9);
    }

    #[test]
    fn removes_markers_inside_selection() {
        let text = "a ~~gone~~ b";
        let edit = toggle(Marker::Strikethrough, text, 2..10);
        assert_eq!(apply(text, &edit), "a gone b");
        assert_eq!(edit.selection, 2..6);
    }

    #[test]
    fn caret_in_word_decorates_word_and_keeps_offset() {
        let text = "foo hello bar";
        let edit = toggle(Marker::Italic, text, 7..7);
        assert_eq!(apply(text, &edit), "foo _hello_ bar");
        assert_eq!(edit.selection, 8..8);
    }

    #[test]
    fn caret_between_spaces_inserts_empty_pair() {
        let edit = toggle(Marker::Bold, "a  b", 2..2);
        assert_eq!(edit.range, 2..2);
        assert_eq!(apply("a  b", &edit), "a **** b");
        assert_eq!(edit.selection, 4..4);
    }

    #[test]
    fn caret_in_empty_text_inserts_pair() {
        let edit = toggle(Marker::Strikethrough, "", 0..0);
        assert_eq!(edit.replacement, "~~~~");
        assert_eq!(edit.selection, 2..2);
    }

    #[test]
    fn double_toggle_restores_original() {
        toggle_twice(Marker::Bold, "foo hello bar", 4..9);
        toggle_twice(Marker::Italic, "foo hello bar", 0..13);
        toggle_twice(Marker::Strikethrough, "foo hello bar", 6..6);
        toggle_twice(Marker::Bold, "a  b", 2..2);
        toggle_twice(Marker::Bold, "", 0..0);
        toggle_twice(Marker::Italic, "naïve café", 8..10);
    }

    #[test]
    fn double_toggle_on_decorated_word_restores_original() {
        toggle_twice(Marker::Bold, "x **word** y", 5..5);
    }

    #[test]
    fn caret_on_decorated_word_edge_shifts_into_neighbour() {
        let text = "x **word** y";
        let first = toggle(Marker::Bold, text, 2..2);
        let plain = apply(text, &first);
        assert_eq!(plain, "x word y");
        assert_eq!(first.selection, 0..0);
        let second = toggle(Marker::Bold, &plain, first.selection);
        assert_eq!(apply(&plain, &second), "**x** word y");
    }

    #[test]
    fn outside_check_respects_text_bounds() {
        let chars: Vec<char> = "*a*".chars().collect();
        assert_eq!(classify(&chars, 1..2, Marker::Bold), DecorationPosition::None);
    }

    #[test]
    fn marker_parsing_and_shortcuts() {
        assert_eq!("bold".parse::<Marker>(), Ok(Marker::Bold));
        assert_eq!("~~".parse::<Marker>(), Ok(Marker::Strikethrough));
        assert!("underline".parse::<Marker>().is_err());
        assert_eq!(Marker::from_shortcut('I'), Some(Marker::Italic));
        assert_eq!(Marker::from_shortcut('x'), None);
    }
}
