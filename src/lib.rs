//! Root crate facade for the composer engine and its replay tool.

pub mod replay;

pub use composer_core::{
    buffer, composer, config, constants, continuation, decoration, env, error, history, keys,
    memory, snapshot, surface, Composer, ComposerConfig, ComposerError, EditorHistory, Key,
    KeyEvent, KeyHandling, Marker, MemorySurface, Modifiers, Provenance, SelectionPolicy,
    Snapshot, TextSurface,
};
pub use replay::{run_script, ReplayError, ReplayReport, Script, Step};
