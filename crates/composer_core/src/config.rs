//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_HISTORY_LIMIT, HISTORY_LIMIT_ENV, LIST_CONTINUATION_ENV};
use crate::error::ComposerError;
use serde::Deserialize;
use std::env;

/// Runtime configuration for a composer instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Maximum number of snapshots kept on the undo stack (baseline included).
    pub history_limit: usize,
    /// Whether plain Enter continues markdown lists.
    pub list_continuation: bool,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            list_continuation: true,
        }
    }
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_history_limit(raw: &str) -> Result<usize, ComposerError> {
    let limit: usize = raw.trim().parse().map_err(|_| {
        ComposerError::Config(format!(
            "{} must be a positive integer, got '{}'",
            HISTORY_LIMIT_ENV, raw
        ))
    })?;
    if limit == 0 {
        return Err(ComposerError::Config(format!(
            "{} must be at least 1",
            HISTORY_LIMIT_ENV
        )));
    }
    Ok(limit)
}

impl ComposerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`ComposerConfig`] with defaults applied when env vars are missing.
    ///
    /// # Errors
    /// Returns [`ComposerError::Config`] when a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ComposerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    /// Returns [`ComposerError::Config`] for a zero or non-numeric history limit,
    /// or an unrecognized list-continuation flag.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ComposerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();
        if let Some(raw) = read(HISTORY_LIMIT_ENV) {
            config.history_limit = parse_history_limit(&raw)?;
        }
        if let Some(raw) = read(LIST_CONTINUATION_ENV) {
            config.list_continuation = parse_env_flag(&raw).ok_or_else(|| {
                ComposerError::Config(format!(
                    "{} must be a boolean flag, got '{}'",
                    LIST_CONTINUATION_ENV, raw
                ))
            })?;
        }
        Ok(config)
    }

    /// Override the undo stack capacity, keeping at least the baseline entry.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{env_lock, EnvGuard};
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parse_env_flag_accepts_truthy_and_falsy_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert_eq!(parse_env_flag(value), Some(true), "value: {}", value);
        }
        for value in ["0", "false", "FALSE", " no ", "off"] {
            assert_eq!(parse_env_flag(value), Some(false), "value: {}", value);
        }
        assert_eq!(parse_env_flag("maybe"), None);
    }

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let config = ComposerConfig::from_lookup(lookup_from(&[])).expect("config");
        assert_eq!(config, ComposerConfig::default());
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
        assert!(config.list_continuation);
    }

    #[test]
    fn reads_overrides_from_lookup() {
        let config = ComposerConfig::from_lookup(lookup_from(&[
            (HISTORY_LIMIT_ENV, "25"),
            (LIST_CONTINUATION_ENV, "off"),
        ]))
        .expect("config");
        assert_eq!(config.history_limit, 25);
        assert!(!config.list_continuation);
    }

    #[test]
    fn rejects_zero_and_garbage_limits() {
        for raw in ["0", "ten", "-3"] {
            let err = ComposerConfig::from_lookup(lookup_from(&[(HISTORY_LIMIT_ENV, raw)]))
                .expect_err("invalid limit");
            assert!(matches!(err, ComposerError::Config(_)), "raw: {}", raw);
        }
    }

    #[test]
    fn rejects_unknown_flag_values() {
        let err =
            ComposerConfig::from_lookup(lookup_from(&[(LIST_CONTINUATION_ENV, "sometimes")]))
                .expect_err("invalid flag");
        assert!(err.to_string().contains(LIST_CONTINUATION_ENV));
    }

    #[test]
    fn deserializes_partial_json_with_defaults() {
        let config: ComposerConfig =
            serde_json::from_str(r#"{"history_limit": 7}"#).expect("json");
        assert_eq!(config.history_limit, 7);
        assert!(config.list_continuation);
    }

    #[test]
    fn from_env_reads_process_environment() {
        let _lock = env_lock();
        let _limit = EnvGuard::set(HISTORY_LIMIT_ENV, " 12 ");
        let _flag = EnvGuard::remove(LIST_CONTINUATION_ENV);
        let config = ComposerConfig::from_env().expect("config");
        assert_eq!(config.history_limit, 12);
        assert!(config.list_continuation);
    }

    #[test]
    fn with_history_limit_keeps_baseline_slot() {
        assert_eq!(ComposerConfig::default().with_history_limit(0).history_limit, 1);
    }
}
