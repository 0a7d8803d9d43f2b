//! Block kinds and run-intent modes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a block
///
/// A closed variant set: code blocks are executable, prose blocks are
/// rendered as static content until explicitly entered for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Executable code
    Code,
    /// Prose (markdown or similar), not executable
    Prose,
}

impl BlockKind {
    /// Returns true for executable blocks
    pub fn is_runnable(&self) -> bool {
        matches!(self, BlockKind::Code)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Code => write!(f, "code"),
            BlockKind::Prose => write!(f, "prose"),
        }
    }
}

/// Run-intent mode
///
/// Determines which blocks a run request targets, always in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    /// Run the named block only
    RunBlockOnly,
    /// Run every block from the document start through the named block
    RunUpToBlock,
    /// Run every block in the document, regardless of the invoking block
    RunAllFromTop,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::RunBlockOnly => write!(f, "run-block-only"),
            RunMode::RunUpToBlock => write!(f, "run-up-to-block"),
            RunMode::RunAllFromTop => write!(f, "run-all-from-top"),
        }
    }
}
