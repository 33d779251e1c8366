//! Shared constants used across composer crates.

/// Default number of snapshots retained by the undo stack.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Indentation unit inserted by Tab and stripped by Shift+Tab.
pub const INDENT_UNIT: &str = "  ";

/// Environment variable overriding the undo stack capacity.
pub const HISTORY_LIMIT_ENV: &str = "COMPOSER_HISTORY_LIMIT";

/// Environment variable toggling markdown list continuation on Enter.
pub const LIST_CONTINUATION_ENV: &str = "COMPOSER_LIST_CONTINUATION";
