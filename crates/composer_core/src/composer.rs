//! Composer controller: key dispatch and the single edit pipeline.

use crate::config::ComposerConfig;
use crate::continuation;
use crate::decoration::{self, Marker};
use crate::history::{EditorHistory, Provenance};
use crate::keys::{shortcut_for, Key, KeyEvent, KeyHandling, ShortcutCommand};
use crate::snapshot::Snapshot;
use crate::surface::{SelectionPolicy, TextSurface};
use std::fmt;
use std::ops::Range;
use tracing::debug;

type Callback = Box<dyn FnMut()>;

/// Editing engine bound to one host surface.
///
/// Every mutation flows through [`Composer::apply_edit`] (or its private
/// sibling that also sets a selection), which tags the change with a
/// [`Provenance`] and lets the history decide whether to record it.
pub struct Composer<S: TextSurface> {
    surface: S,
    history: EditorHistory,
    config: ComposerConfig,
    composing: bool,
    preedit: Option<Range<usize>>,
    on_mod_enter: Option<Callback>,
    on_escape: Option<Callback>,
}

impl<S: TextSurface + fmt::Debug> fmt::Debug for Composer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composer")
            .field("surface", &self.surface)
            .field("history", &self.history)
            .field("config", &self.config)
            .field("composing", &self.composing)
            .field("preedit", &self.preedit)
            .finish_non_exhaustive()
    }
}

impl<S: TextSurface> Composer<S> {
    /// Attach to `surface` with default configuration.
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, ComposerConfig::default())
    }

    /// Attach to `surface`, seeding history with its current state.
    pub fn with_config(surface: S, config: ComposerConfig) -> Self {
        let history = EditorHistory::with_capacity(surface.snapshot(), config.history_limit);
        Self {
            surface,
            history,
            config,
            composing: false,
            preedit: None,
            on_mod_enter: None,
            on_escape: None,
        }
    }

    /// Register the Ctrl/Cmd+Enter (submit) callback.
    pub fn on_mod_enter(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_mod_enter = Some(Box::new(callback));
        self
    }

    /// Register the Escape (cancel) callback.
    pub fn on_escape(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_escape = Some(Box::new(callback));
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for host-side selection changes and self-applied edits.
    ///
    /// Content changes made here must be reported with [`Composer::handle_input`].
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn history(&self) -> &EditorHistory {
        &self.history
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Snapshot {
        self.surface.snapshot()
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Provenance for edits originating right now.
    fn provenance(&self) -> Provenance {
        Provenance::from_flags(self.composing, false)
    }

    /// Replace `range` with `text` on the surface and report the change.
    pub fn apply_edit(
        &mut self,
        range: Range<usize>,
        text: &str,
        policy: SelectionPolicy,
        provenance: Provenance,
    ) {
        self.surface.replace_range(range, text, policy);
        self.history
            .notify_change(self.surface.snapshot(), provenance);
    }

    fn commit(
        &mut self,
        range: Range<usize>,
        text: &str,
        policy: SelectionPolicy,
        selection: Option<Range<usize>>,
    ) {
        self.surface.replace_range(range, text, policy);
        if let Some(selection) = selection {
            self.surface.set_selection(selection);
        }
        let provenance = self.provenance();
        self.history
            .notify_change(self.surface.snapshot(), provenance);
        self.surface.focus();
    }

    /// Type `text` over the current selection.
    pub fn insert_text(&mut self, text: &str) {
        let selection = self.surface.selection();
        let provenance = self.provenance();
        self.apply_edit(selection, text, SelectionPolicy::CollapseToEnd, provenance);
    }

    /// Replace the whole value programmatically, recorded like a user edit.
    pub fn set_value(&mut self, text: &str) {
        let len = self.surface.text().chars().count();
        let provenance = self.provenance();
        self.apply_edit(0..len, text, SelectionPolicy::CollapseToEnd, provenance);
    }

    /// Record a change the host already applied to its own surface.
    pub fn handle_input(&mut self) {
        let provenance = self.provenance();
        self.history
            .notify_change(self.surface.snapshot(), provenance);
    }

    /// Load a new draft, discarding history.
    pub fn reset(&mut self, text: &str) {
        let len = self.surface.text().chars().count();
        self.surface
            .replace_range(0..len, text, SelectionPolicy::CollapseToEnd);
        self.composing = false;
        self.preedit = None;
        self.history.reset(self.surface.snapshot());
    }

    /// An IME composition session started.
    pub fn composition_start(&mut self) {
        self.history
            .notify_composition_start(self.surface.snapshot());
        self.composing = true;
        self.preedit = None;
    }

    /// Show intermediate composition text in place of the previous preedit.
    ///
    /// Starts a session implicitly when none is active.
    pub fn composition_update(&mut self, text: &str) {
        if !self.composing {
            self.composition_start();
        }
        let range = self
            .preedit
            .clone()
            .unwrap_or_else(|| self.surface.selection());
        self.apply_edit(
            range.clone(),
            text,
            SelectionPolicy::CollapseToEnd,
            Provenance::Composition,
        );
        self.preedit = Some(range.start..range.start + text.chars().count());
    }

    /// The composition session ended; its result becomes one undo step.
    pub fn composition_end(&mut self) {
        self.composing = false;
        self.preedit = None;
        self.history
            .notify_composition_end(self.surface.snapshot());
    }

    /// # Returns
    /// `true` when an earlier state was restored.
    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.surface).is_some()
    }

    /// # Returns
    /// `true` when an undone state was re-applied.
    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.surface).is_some()
    }

    /// Toggle `marker` around the selection or the word under the caret.
    ///
    /// Shared by keyboard shortcuts and toolbar buttons.
    pub fn toggle_decoration(&mut self, marker: Marker) {
        let edit = decoration::toggle(marker, &self.surface.text(), self.surface.selection());
        self.commit(
            edit.range,
            &edit.replacement,
            SelectionPolicy::Preserve,
            Some(edit.selection),
        );
    }

    /// Dispatch one key-down.
    ///
    /// Shortcuts, Tab, Escape, Ctrl/Cmd+Enter and list continuation are tried
    /// in that order; the first one that handles the key wins.
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyHandling {
        if let Some(command) = shortcut_for(event) {
            debug!(target: "composer_core::dispatch", ?command, "shortcut");
            match command {
                ShortcutCommand::Undo => {
                    self.undo();
                }
                ShortcutCommand::Redo => {
                    self.redo();
                }
                ShortcutCommand::Decorate(marker) => self.toggle_decoration(marker),
            }
            return KeyHandling::Consumed;
        }
        if self.handle_tab(event) {
            return KeyHandling::Consumed;
        }
        match event.key {
            Key::Escape => Self::invoke(self.on_escape.as_mut(), "escape"),
            Key::Enter if event.modifiers.command() => {
                Self::invoke(self.on_mod_enter.as_mut(), "mod_enter")
            }
            Key::Enter if !event.modifiers.any() => self.handle_enter(),
            _ => KeyHandling::Default,
        }
    }

    /// Run a registered callback; the key is consumed either way.
    fn invoke(callback: Option<&mut Callback>, name: &'static str) -> KeyHandling {
        if let Some(callback) = callback {
            debug!(target: "composer_core::dispatch", callback = name, "invoking callback");
            callback();
        }
        KeyHandling::Consumed
    }

    /// Indent or outdent on Tab; ignores every other key.
    ///
    /// # Returns
    /// `true` when the key was Tab, whether or not the text changed.
    fn handle_tab(&mut self, event: &KeyEvent) -> bool {
        if event.key != Key::Tab {
            return false;
        }
        self.history.push_undo(self.surface.snapshot());
        let edit = continuation::indent(
            &self.surface.text(),
            self.surface.selection(),
            event.modifiers.shift,
        );
        if let Some(edit) = edit {
            debug!(
                target: "composer_core::dispatch",
                outdent = event.modifiers.shift,
                start = edit.range.start,
                end = edit.range.end,
                "indent"
            );
            self.commit(edit.range, &edit.replacement, edit.policy, None);
            self.history.clear_redo();
        }
        true
    }

    fn handle_enter(&mut self) -> KeyHandling {
        if !self.config.list_continuation {
            return KeyHandling::Default;
        }
        let text = self.surface.text();
        let Some(edit) = continuation::continue_list(&text, self.surface.selection()) else {
            return KeyHandling::Default;
        };
        debug!(
            target: "composer_core::dispatch",
            exit_list = edit.replacement.is_empty(),
            "list continuation"
        );
        self.commit(edit.range, &edit.replacement, edit.policy, None);
        KeyHandling::Consumed
    }
}
