//! Scripted replay of editing sessions against an in-memory surface.
//!
//! A script seeds the buffer and then feeds the composer the same events a
//! host would: key-downs, typed text, selection changes and IME composition.

use composer_core::{
    Composer, ComposerConfig, ComposerError, Key, KeyEvent, Marker, MemorySurface, Modifiers,
    Snapshot, TextSurface,
};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while loading or running a replay script.
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Malformed script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Step {index} ({op}): {source}")]
    Step {
        index: usize,
        op: &'static str,
        #[source]
        source: ComposerError,
    },

    #[error(transparent)]
    Composer(#[from] ComposerError),
}

/// Initial buffer state plus the events to replay.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub text: String,
    /// `[start, end]` in chars; defaults to a caret at the end of `text`.
    #[serde(default)]
    pub selection: Option<[usize; 2]>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    /// Decode a script from JSON.
    ///
    /// # Errors
    /// Returns [`ReplayError::Parse`] when the input is not a valid script.
    pub fn from_json(input: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(input)?)
    }
}

/// One host event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Key {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        meta: bool,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        alt: bool,
    },
    Insert {
        text: String,
    },
    Select {
        start: usize,
        end: usize,
    },
    SetValue {
        text: String,
    },
    CompositionStart,
    CompositionUpdate {
        text: String,
    },
    CompositionEnd,
    Toggle {
        marker: String,
    },
    Undo,
    Redo,
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Self::Key { .. } => "key",
            Self::Insert { .. } => "insert",
            Self::Select { .. } => "select",
            Self::SetValue { .. } => "set_value",
            Self::CompositionStart => "composition_start",
            Self::CompositionUpdate { .. } => "composition_update",
            Self::CompositionEnd => "composition_end",
            Self::Toggle { .. } => "toggle",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }
}

/// Final state after a replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub text: String,
    pub selection_start: usize,
    pub selection_end: usize,
    pub undo_depth: usize,
    pub redo_depth: usize,
    /// Key events the composer consumed instead of leaving to the host.
    pub consumed_keys: usize,
    pub submits: usize,
    pub cancels: usize,
}

/// Run `script` from start to finish.
///
/// Keys left to the host default are not emulated, so an unconsumed Enter
/// does not insert a newline.
///
/// # Errors
/// Returns [`ReplayError`] for an out-of-range selection, an unknown key name
/// or an unknown marker.
pub fn run_script(script: &Script, config: ComposerConfig) -> Result<ReplayReport, ReplayError> {
    let len = script.text.chars().count();
    let [start, end] = script.selection.unwrap_or([len, len]);
    let initial = Snapshot::new(script.text.as_str(), start, end)?;
    let surface = MemorySurface::with_selection(initial.text(), initial.selection());

    let submits = Rc::new(Cell::new(0usize));
    let cancels = Rc::new(Cell::new(0usize));
    let (on_submit, on_cancel) = (Rc::clone(&submits), Rc::clone(&cancels));
    let mut composer = Composer::with_config(surface, config)
        .on_mod_enter(move || on_submit.set(on_submit.get() + 1))
        .on_escape(move || on_cancel.set(on_cancel.get() + 1));

    let mut consumed_keys = 0;
    for (index, step) in script.steps.iter().enumerate() {
        debug!(index, op = step.name(), "replay step");
        let consumed = apply_step(&mut composer, step).map_err(|source| ReplayError::Step {
            index,
            op: step.name(),
            source,
        })?;
        if consumed {
            consumed_keys += 1;
        }
    }

    let snapshot = composer.snapshot();
    let report = ReplayReport {
        text: snapshot.text().to_string(),
        selection_start: snapshot.selection_start(),
        selection_end: snapshot.selection_end(),
        undo_depth: composer.history().undo_depth(),
        redo_depth: composer.history().redo_depth(),
        consumed_keys,
        submits: submits.get(),
        cancels: cancels.get(),
    };
    info!(
        steps = script.steps.len(),
        undo_depth = report.undo_depth,
        "replay finished"
    );
    Ok(report)
}

/// # Returns
/// `true` when the step was a key the composer consumed.
fn apply_step(
    composer: &mut Composer<MemorySurface>,
    step: &Step,
) -> Result<bool, ComposerError> {
    match step {
        Step::Key {
            key,
            ctrl,
            meta,
            shift,
            alt,
        } => {
            let modifiers = Modifiers {
                ctrl: *ctrl,
                meta: *meta,
                shift: *shift,
                alt: *alt,
            };
            let event = KeyEvent::new(key.parse::<Key>()?, modifiers);
            return Ok(composer.handle_key(&event).is_consumed());
        }
        Step::Insert { text } => composer.insert_text(text),
        Step::Select { start, end } => {
            let text = composer.surface().text();
            let selection = Snapshot::new(text, *start, *end)?.selection();
            composer.surface_mut().set_selection(selection);
        }
        Step::SetValue { text } => composer.set_value(text),
        Step::CompositionStart => composer.composition_start(),
        Step::CompositionUpdate { text } => composer.composition_update(text),
        Step::CompositionEnd => composer.composition_end(),
        Step::Toggle { marker } => composer.toggle_decoration(marker.parse::<Marker>()?),
        Step::Undo => {
            composer.undo();
        }
        Step::Redo => {
            composer.redo();
        }
    }
    Ok(false)
}
