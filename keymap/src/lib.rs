#![no_std]

//! # Keymap
//!
//! This crate maps keyboard chords to editor intents.
//!
//! ## Philosophy
//!
//! - **Events, not bytes**: Input is structured events, not raw scan codes
//! - **Context-sensitive**: The same chord can mean different things depending
//!   on whether an editing surface holds focus
//! - **Testable**: Events are plain values and can be constructed in tests
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - Raw hardware scan codes (PS/2, USB HID)
//! - A text input method (printable characters flow to the surface directly)
//! - A user-configurable binding system

use core::fmt;
use serde::{Deserialize, Serialize};

/// Logical key code
///
/// Only the keys that participate in chord resolution are named; everything
/// else arrives as [`KeyCode::Char`] and falls through to text insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Enter,
    Escape,
    Up,
    Down,
    Z,
    Y,
    Digit1,
    Digit2,
    Digit3,
    /// Any printable character not covered above
    Char(char),
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Modifier keys
///
/// Bitflags representing modifier key states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    /// No modifiers
    pub const NONE: Self = Self { bits: 0 };
    /// Control key
    pub const CTRL: Self = Self { bits: 1 << 0 };
    /// Alt key
    pub const ALT: Self = Self { bits: 1 << 1 };
    /// Shift key
    pub const SHIFT: Self = Self { bits: 1 << 2 };
    /// Meta/Super/Command key
    pub const META: Self = Self { bits: 1 << 3 };

    /// Creates a new modifier set with no modifiers
    pub fn none() -> Self {
        Self::NONE
    }

    /// Adds a modifier
    pub fn with(mut self, other: Modifiers) -> Self {
        self.bits |= other.bits;
        self
    }

    /// Checks if a modifier is present
    pub fn contains(&self, other: Modifiers) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Checks if Ctrl is pressed
    pub fn is_ctrl(&self) -> bool {
        self.contains(Self::CTRL)
    }

    /// Checks if Alt is pressed
    pub fn is_alt(&self) -> bool {
        self.contains(Self::ALT)
    }

    /// Checks if Shift is pressed
    pub fn is_shift(&self) -> bool {
        self.contains(Self::SHIFT)
    }

    /// Checks if Meta is pressed
    pub fn is_meta(&self) -> bool {
        self.contains(Self::META)
    }

    /// Returns true if no modifiers are pressed
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// True when either primary chord modifier is held (Ctrl or Meta)
    pub fn is_primary(&self) -> bool {
        self.is_ctrl() || self.is_meta()
    }
}

/// Keyboard event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// The key that was struck
    pub code: KeyCode,
    /// Modifier keys that were active
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Creates a new key event
    pub fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// Creates an unmodified key event
    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::none())
    }
}

/// Side panel tabs addressable by chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelTab {
    Inspector,
    Logs,
    Docs,
}

/// Editor intent resolved from a keyboard chord
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorIntent {
    /// Run the current block in place
    RunCurrent,
    /// Run the current block, then select the next block
    RunCurrentAndAdvance,
    /// Run every runnable block from the top of the document
    RunAllFromTop,
    /// Undo the most recent edit anywhere in the document
    Undo,
    /// Redo the most recently undone edit
    Redo,
    /// Leave the focused surface, keeping its block selected
    ExitSurface,
    /// Begin editing the selected block
    EnterSelected,
    /// Move block selection upward
    SelectPrevious,
    /// Move block selection downward
    SelectNext,
    /// Reveal a side panel tab
    ShowPanelTab(PanelTab),
}

/// Resolves a key event against the chord table
///
/// `surface_focused` gates the bindings that would otherwise collide with
/// text editing: plain Enter and the arrow keys belong to the surface while
/// it holds focus. Run, undo and panel chords resolve in either context.
/// Returns `None` when the event carries no intent and should flow to the
/// focused surface as ordinary input.
pub fn resolve(event: &KeyEvent, surface_focused: bool) -> Option<EditorIntent> {
    let mods = event.modifiers;
    match event.code {
        KeyCode::Enter => {
            if mods.is_primary() && mods.is_shift() {
                Some(EditorIntent::RunAllFromTop)
            } else if mods.is_primary() {
                Some(EditorIntent::RunCurrent)
            } else if mods.is_shift() {
                Some(EditorIntent::RunCurrentAndAdvance)
            } else if !surface_focused && mods.is_empty() {
                Some(EditorIntent::EnterSelected)
            } else {
                None
            }
        }
        KeyCode::Escape => Some(EditorIntent::ExitSurface),
        KeyCode::Up if !surface_focused && mods.is_empty() => Some(EditorIntent::SelectPrevious),
        KeyCode::Down if !surface_focused && mods.is_empty() => Some(EditorIntent::SelectNext),
        KeyCode::Z if mods.is_primary() => {
            if mods.is_shift() {
                Some(EditorIntent::Redo)
            } else {
                Some(EditorIntent::Undo)
            }
        }
        KeyCode::Y if mods.is_primary() && !mods.is_shift() => Some(EditorIntent::Redo),
        KeyCode::Digit1 if mods == Modifiers::ALT => {
            Some(EditorIntent::ShowPanelTab(PanelTab::Inspector))
        }
        KeyCode::Digit2 if mods == Modifiers::ALT => {
            Some(EditorIntent::ShowPanelTab(PanelTab::Logs))
        }
        KeyCode::Digit3 if mods == Modifiers::ALT => {
            Some(EditorIntent::ShowPanelTab(PanelTab::Docs))
        }
        _ => None,
    }
}
