//! Key events and shortcut resolution for the composer.

use crate::decoration::Marker;
use crate::error::ComposerError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Physical key relevant to the composer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Tab,
    Escape,
    /// Printable key, reported as typed.
    Char(char),
}

impl FromStr for Key {
    type Err = ComposerError;

    /// Parse a key name such as `Enter`, `tab`, `Esc` or a single character.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut chars = value.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return Ok(Self::Char(ch));
        }
        match value.trim().to_ascii_lowercase().as_str() {
            "enter" | "return" => Ok(Self::Enter),
            "tab" => Ok(Self::Tab),
            "escape" | "esc" => Ok(Self::Escape),
            "space" => Ok(Self::Char(' ')),
            _ => Err(ComposerError::UnknownKey(value.to_string())),
        }
    }
}

/// Modifier state at key-down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS, Super/Windows elsewhere.
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        meta: false,
        shift: false,
        alt: false,
    };

    /// Ctrl or Cmd, the platform shortcut modifier.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    pub fn any(&self) -> bool {
        self.ctrl || self.meta || self.shift || self.alt
    }
}

/// One key-down delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Key pressed without modifiers.
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// Key pressed with Ctrl.
    pub fn ctrl(key: Key) -> Self {
        Self::new(
            key,
            Modifiers {
                ctrl: true,
                ..Modifiers::NONE
            },
        )
    }

    /// Key pressed with Shift.
    pub fn shift(key: Key) -> Self {
        Self::new(
            key,
            Modifiers {
                shift: true,
                ..Modifiers::NONE
            },
        )
    }

    /// Same key with Shift added.
    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }
}

/// Editing command bound to a Ctrl/Cmd shortcut.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShortcutCommand {
    Undo,
    Redo,
    Decorate(Marker),
}

/// Resolve a Ctrl/Cmd shortcut, or `None` when the event is not one.
pub fn shortcut_for(event: &KeyEvent) -> Option<ShortcutCommand> {
    if !event.modifiers.command() {
        return None;
    }
    let Key::Char(ch) = event.key else {
        return None;
    };
    match ch.to_ascii_lowercase() {
        'z' if event.modifiers.shift => Some(ShortcutCommand::Redo),
        'z' => Some(ShortcutCommand::Undo),
        'y' => Some(ShortcutCommand::Redo),
        other => Marker::from_shortcut(other).map(ShortcutCommand::Decorate),
    }
}

/// Whether the host should run its own default handling for a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyHandling {
    /// The composer handled the key; suppress the host default.
    Consumed,
    /// Let the host apply its default behavior.
    Default,
}

impl KeyHandling {
    pub fn is_consumed(self) -> bool {
        self == Self::Consumed
    }
}
