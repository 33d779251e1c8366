//! Undo/redo history for the composer.
//!
//! Every entry is the full post-edit state, so undo and redo are a single
//! replace against the surface regardless of how the edit was produced.

use crate::constants::DEFAULT_HISTORY_LIMIT;
use crate::snapshot::Snapshot;
use crate::surface::{SelectionPolicy, TextSurface};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Origin of an edit, deciding whether it becomes a history entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Typing or a programmatic edit on the user's behalf.
    User,
    /// Intermediate IME composition state.
    Composition,
    /// History replay from undo/redo.
    Replay,
}

impl Provenance {
    /// Map the host's composing/replaying flags onto a provenance.
    ///
    /// Replay wins over composition.
    pub fn from_flags(is_composing: bool, is_replaying: bool) -> Self {
        if is_replaying {
            Self::Replay
        } else if is_composing {
            Self::Composition
        } else {
            Self::User
        }
    }
}

/// Snapshot-based undo/redo stacks with a bounded undo side.
#[derive(Clone, Debug)]
pub struct EditorHistory {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    capacity: usize,
}

impl EditorHistory {
    /// History seeded with `baseline` and the default capacity.
    pub fn new(baseline: Snapshot) -> Self {
        Self::with_capacity(baseline, DEFAULT_HISTORY_LIMIT)
    }

    /// History seeded with `baseline`, keeping at most `capacity` undo entries.
    ///
    /// A capacity of zero is raised to one so the baseline always survives.
    pub fn with_capacity(baseline: Snapshot, capacity: usize) -> Self {
        let mut undo = VecDeque::with_capacity(capacity.clamp(1, DEFAULT_HISTORY_LIMIT));
        undo.push_back(baseline);
        Self {
            undo,
            redo: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Drop both stacks and start again from `baseline`.
    pub fn reset(&mut self, baseline: Snapshot) {
        self.undo.clear();
        self.redo.clear();
        self.undo.push_back(baseline);
    }

    /// Append `snapshot` unless it equals the current top.
    ///
    /// # Returns
    /// `true` when a new entry was pushed.
    pub fn push_undo(&mut self, snapshot: Snapshot) -> bool {
        if self.undo.back() == Some(&snapshot) {
            return false;
        }
        self.undo.push_back(snapshot);
        while self.undo.len() > self.capacity {
            let _evicted = self.undo.pop_front();
        }
        true
    }

    pub fn clear_redo(&mut self) {
        self.redo.clear();
    }

    /// Record a content change according to its provenance.
    pub fn notify_change(&mut self, snapshot: Snapshot, provenance: Provenance) {
        match provenance {
            Provenance::Replay | Provenance::Composition => {
                trace!(
                    target: "composer_core::history",
                    ?provenance,
                    "change not recorded"
                );
            }
            Provenance::User => {
                self.push_undo(snapshot);
                self.clear_redo();
            }
        }
    }

    /// Capture the state right before an IME session starts.
    pub fn notify_composition_start(&mut self, snapshot: Snapshot) {
        self.push_undo(snapshot);
    }

    /// Capture the committed result of an IME session as one step.
    pub fn notify_composition_end(&mut self, snapshot: Snapshot) {
        self.push_undo(snapshot);
        self.clear_redo();
    }

    /// Step back one entry and replay it onto `surface`.
    ///
    /// # Returns
    /// The snapshot now shown, or `None` when only the baseline remains.
    pub fn undo<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> Option<Snapshot> {
        if self.undo.len() <= 1 {
            return None;
        }
        let current = self.undo.pop_back()?;
        self.redo.push(current);
        let target = self.undo.back()?.clone();
        replay(surface, &target);
        debug!(
            target: "composer_core::history",
            undo_depth = self.undo.len(),
            redo_depth = self.redo.len(),
            "undo"
        );
        Some(target)
    }

    /// Re-apply the most recently undone entry onto `surface`.
    ///
    /// # Returns
    /// The snapshot now shown, or `None` when there is nothing to redo.
    pub fn redo<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> Option<Snapshot> {
        let target = self.redo.pop()?;
        self.push_undo(target.clone());
        replay(surface, &target);
        debug!(
            target: "composer_core::history",
            undo_depth = self.undo.len(),
            redo_depth = self.redo.len(),
            "redo"
        );
        Some(target)
    }

    /// Top of the undo stack, which mirrors the surface between edits.
    pub fn current(&self) -> Option<&Snapshot> {
        self.undo.back()
    }

    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Entries on the undo stack, baseline included.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn replay<S: TextSurface + ?Sized>(surface: &mut S, snapshot: &Snapshot) {
    let len = surface.text().chars().count();
    surface.replace_range(0..len, snapshot.text(), SelectionPolicy::Preserve);
    surface.set_selection(snapshot.selection());
    surface.focus();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySurface;

    fn caret(text: &str) -> Snapshot {
        Snapshot::caret(text, text.chars().count())
    }

    #[test]
    fn push_undo_deduplicates_against_top() {
        let mut history = EditorHistory::new(caret("a"));
        assert!(!history.push_undo(caret("a")));
        assert!(history.push_undo(caret("ab")));
        assert_eq!(history.undo_depth(), 2);
    }

    #[test]
    fn provenance_from_flags_prefers_replay() {
        assert_eq!(Provenance::from_flags(true, true), Provenance::Replay);
        assert_eq!(Provenance::from_flags(true, false), Provenance::Composition);
        assert_eq!(Provenance::from_flags(false, false), Provenance::User);
    }

    #[test]
    fn notify_change_skips_replay_and_composition() {
        let mut history = EditorHistory::new(caret(""));
        history.notify_change(caret("x"), Provenance::Replay);
        history.notify_change(caret("xy"), Provenance::Composition);
        assert_eq!(history.undo_depth(), 1);
        history.notify_change(caret("xyz"), Provenance::User);
        assert_eq!(history.undo_depth(), 2);
    }

    #[test]
    fn undo_and_redo_roundtrip() {
        let mut surface = MemorySurface::new("abc");
        let mut history = EditorHistory::new(surface.snapshot());
        surface.replace_range(1..2, "XYZ", SelectionPolicy::CollapseToEnd);
        history.notify_change(surface.snapshot(), Provenance::User);

        assert_eq!(history.undo(&mut surface), Some(caret("abc")));
        assert_eq!(surface.text(), "abc");
        assert_eq!(surface.selection(), 3..3);
        let redone = history.redo(&mut surface).expect("redo");
        assert_eq!(surface.text(), "aXYZc");
        assert_eq!(redone.selection(), 4..4);
        assert_eq!(surface.selection(), 4..4);
        assert!(!history.can_redo());
        assert_eq!(surface.focus_requests(), 2);
    }

    #[test]
    fn undo_never_pops_the_baseline() {
        let mut surface = MemorySurface::new("seed");
        let mut history = EditorHistory::new(surface.snapshot());
        assert!(history.undo(&mut surface).is_none());
        assert_eq!(history.undo_depth(), 1);
        assert_eq!(surface.revision(), 0);
    }

    #[test]
    fn fresh_edit_invalidates_redo() {
        let mut surface = MemorySurface::new("");
        let mut history = EditorHistory::new(surface.snapshot());
        history.notify_change(caret("a"), Provenance::User);
        surface.replace_range(0..0, "a", SelectionPolicy::CollapseToEnd);
        history.undo(&mut surface);
        assert!(history.can_redo());
        history.notify_change(caret("b"), Provenance::User);
        assert!(!history.can_redo());
        assert!(history.redo(&mut surface).is_none());
    }

    #[test]
    fn capacity_evicts_oldest_entries() {
        let mut history = EditorHistory::with_capacity(caret(""), 3);
        for text in ["a", "ab", "abc", "abcd"] {
            history.notify_change(caret(text), Provenance::User);
        }
        assert_eq!(history.undo_depth(), 3);
        let mut surface = MemorySurface::new("abcd");
        history.undo(&mut surface);
        history.undo(&mut surface);
        assert!(history.undo(&mut surface).is_none());
        assert_eq!(surface.text(), "ab");
    }

    #[test]
    fn composition_end_groups_session_and_clears_redo() {
        let mut surface = MemorySurface::new("");
        let mut history = EditorHistory::new(surface.snapshot());
        history.notify_change(caret("a"), Provenance::User);
        history.undo(&mut surface);
        history.notify_composition_start(surface.snapshot());
        for partial in ["k", "ka", "か"] {
            history.notify_change(caret(partial), Provenance::Composition);
        }
        history.notify_composition_end(caret("か"));
        assert_eq!(history.undo_depth(), 2);
        assert!(!history.can_redo());
    }

    #[test]
    fn reset_reseeds_baseline() {
        let mut history = EditorHistory::new(caret("a"));
        history.notify_change(caret("ab"), Provenance::User);
        history.reset(caret("fresh"));
        assert_eq!(history.current(), Some(&caret("fresh")));
        assert!(!history.can_undo());
    }
}
