//! # Decoration Index
//!
//! Per-block mapping from line number to execution-outcome markers.
//!
//! ## Philosophy
//!
//! - **Replace, not merge**: a stats delivery is the complete latest picture
//!   for its block; applying it discards the previous decoration set
//! - **Validate against live geometry**: a stat addressing a line beyond the
//!   block's current line count is dropped, never clamped, so a marker can
//!   never land on the wrong line after the user deletes trailing lines
//! - **Lossless counts, lossy display**: counts per class are retained in
//!   full for detail display; the rendered marker saturates above 9
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - The rendering layer (glyph drawing belongs to the host view)
//! - The stat transport (see `host_protocol`)

use std::collections::{BTreeMap, HashMap};

use notebook_types::{BlockId, LineStat, OutcomeClass};
use serde::{Deserialize, Serialize};

/// Largest count rendered literally; anything above shows saturated
pub const DISPLAY_COUNT_MAX: u32 = 9;

/// How a count is rendered in the gutter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marker {
    /// The literal count
    Count(u32),
    /// More than [`DISPLAY_COUNT_MAX`] occurrences, rendered as "9+"
    Saturated,
}

/// Decorations for one source line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDecoration {
    pub ok: u32,
    pub warn: u32,
    pub error: u32,
    /// Set by result-entry correlation; at most one line per block
    pub highlighted: bool,
}

impl LineDecoration {
    /// Total outcome count on this line
    pub fn total(&self) -> u32 {
        self.ok + self.warn + self.error
    }

    /// The class that wins the gutter glyph: error > warn > ok
    pub fn dominant(&self) -> Option<OutcomeClass> {
        if self.error > 0 {
            Some(OutcomeClass::Error)
        } else if self.warn > 0 {
            Some(OutcomeClass::Warn)
        } else if self.ok > 0 {
            Some(OutcomeClass::Ok)
        } else {
            None
        }
    }

    /// The rendered marker for the dominant class's count
    pub fn marker(&self) -> Option<Marker> {
        let count = match self.dominant()? {
            OutcomeClass::Error => self.error,
            OutcomeClass::Warn => self.warn,
            OutcomeClass::Ok => self.ok,
        };
        if count > DISPLAY_COUNT_MAX {
            Some(Marker::Saturated)
        } else {
            Some(Marker::Count(count))
        }
    }

    fn add(&mut self, class: OutcomeClass, count: u32) {
        match class {
            OutcomeClass::Ok => self.ok += count,
            OutcomeClass::Warn => self.warn += count,
            OutcomeClass::Error => self.error += count,
        }
    }
}

/// Result of applying a stats delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedStats {
    /// Stats merged into the decoration set
    pub applied: usize,
    /// Stats dropped for addressing lines beyond current content
    pub dropped: usize,
}

/// The decoration sets of every block
#[derive(Debug, Default)]
pub struct DecorationIndex {
    blocks: HashMap<BlockId, BTreeMap<u32, LineDecoration>>,
}

impl DecorationIndex {
    /// Creates an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces a block's decoration set from a stats delivery
    ///
    /// `line_count` is the block's current line count; stats addressing
    /// lines beyond it (or line 0) are dropped. Multiple stats for the same
    /// line and class accumulate.
    pub fn apply_stats(
        &mut self,
        block_id: BlockId,
        stats: &[LineStat],
        line_count: u32,
    ) -> AppliedStats {
        let mut lines: BTreeMap<u32, LineDecoration> = BTreeMap::new();
        let mut applied = 0;
        let mut dropped = 0;
        for stat in stats {
            if stat.line_number == 0 || stat.line_number > line_count {
                dropped += 1;
                continue;
            }
            lines
                .entry(stat.line_number)
                .or_default()
                .add(stat.outcome_class, stat.count);
            applied += 1;
        }
        if lines.is_empty() {
            self.blocks.remove(&block_id);
        } else {
            self.blocks.insert(block_id, lines);
        }
        AppliedStats { applied, dropped }
    }

    /// The decoration for one line, if any
    pub fn line(&self, block_id: BlockId, line_number: u32) -> Option<&LineDecoration> {
        self.blocks.get(&block_id)?.get(&line_number)
    }

    /// All decorated lines of a block in line order
    pub fn lines(&self, block_id: BlockId) -> impl Iterator<Item = (u32, &LineDecoration)> {
        self.blocks
            .get(&block_id)
            .into_iter()
            .flat_map(|lines| lines.iter().map(|(line, deco)| (*line, deco)))
    }

    /// Number of decorated lines in a block
    pub fn decorated_line_count(&self, block_id: BlockId) -> usize {
        self.blocks.get(&block_id).map(|l| l.len()).unwrap_or(0)
    }

    /// Highlights a line to correlate a result entry with its source
    ///
    /// At most one line per block is highlighted; setting a new highlight
    /// clears the previous one. Returns false if the line carries no
    /// decoration to highlight.
    pub fn highlight_line(&mut self, block_id: BlockId, line_number: u32) -> bool {
        let Some(lines) = self.blocks.get_mut(&block_id) else {
            return false;
        };
        if !lines.contains_key(&line_number) {
            return false;
        }
        for (line, decoration) in lines.iter_mut() {
            decoration.highlighted = *line == line_number;
        }
        true
    }

    /// Clears the highlight in a block
    pub fn clear_highlight(&mut self, block_id: BlockId) {
        if let Some(lines) = self.blocks.get_mut(&block_id) {
            for decoration in lines.values_mut() {
                decoration.highlighted = false;
            }
        }
    }

    /// The currently highlighted line of a block, if any
    pub fn highlighted_line(&self, block_id: BlockId) -> Option<u32> {
        self.blocks
            .get(&block_id)?
            .iter()
            .find(|(_, d)| d.highlighted)
            .map(|(line, _)| *line)
    }

    /// Discards all decorations for a removed block
    pub fn remove_block(&mut self, block_id: BlockId) {
        self.blocks.remove(&block_id);
    }
}
