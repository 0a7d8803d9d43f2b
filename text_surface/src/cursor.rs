//! Cursor and selection types
//!
//! Coordinates are 1-based: line 1 is the first line, column 1 is before the
//! first character, column `line_length + 1` is after the last character.

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use crate::buffer::TextBuffer;

/// Cursor position inside a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct CursorPosition {
    pub line: u32,
    pub column: u32,
}

impl CursorPosition {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Position at the start of the buffer
    pub const fn start() -> Self {
        Self { line: 1, column: 1 }
    }

    /// Clamps this position into the bounds of `buffer`
    ///
    /// Line is clamped to `[1, line_count]`, column to
    /// `[1, line_length(line) + 1]`.
    pub fn clamped_to(self, buffer: &TextBuffer) -> Self {
        let line = self.line.clamp(1, buffer.line_count());
        let column = self.column.clamp(1, buffer.line_length(line) + 1);
        Self { line, column }
    }
}

impl Default for CursorPosition {
    fn default() -> Self {
        Self::start()
    }
}

/// A text selection between two positions
///
/// `start` and `end` are in document order; an empty selection (start == end)
/// is equivalent to a bare cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Selection {
    pub start: CursorPosition,
    pub end: CursorPosition,
}

impl Selection {
    pub const fn new(start: CursorPosition, end: CursorPosition) -> Self {
        Self { start, end }
    }

    /// Returns true if the selection spans no characters
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Clamps both endpoints into the bounds of `buffer`
    pub fn clamped_to(self, buffer: &TextBuffer) -> Self {
        Self {
            start: self.start.clamped_to(buffer),
            end: self.end.clamped_to(buffer),
        }
    }
}
