//! Plain-text editing engine for markdown comment composers.
//!
//! Undo/redo history with IME grouping, inline decoration toggling, list
//! continuation and block indentation, driven through a host [`TextSurface`].

/// Rope storage behind the in-memory surface.
pub mod buffer;
/// The controller tying history, decorations and keys together.
pub mod composer;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// List continuation and Tab indentation.
pub mod continuation;
/// Bold/italic/strikethrough toggling.
pub mod decoration;
/// Test helpers for scoped environment overrides.
pub mod env;
/// Engine error types.
pub mod error;
/// Snapshot-based undo/redo.
pub mod history;
/// Key events and shortcut resolution.
pub mod keys;
/// Headless surface adapter.
pub mod memory;
/// Immutable history entries.
pub mod snapshot;
/// Host surface port.
pub mod surface;

pub use composer::Composer;
pub use config::ComposerConfig;
pub use decoration::Marker;
pub use error::ComposerError;
pub use history::{EditorHistory, Provenance};
pub use keys::{Key, KeyEvent, KeyHandling, Modifiers};
pub use memory::MemorySurface;
pub use snapshot::Snapshot;
pub use surface::{SelectionPolicy, TextSurface};
