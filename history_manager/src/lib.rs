//! # History Manager
//!
//! One process-wide undo/redo timeline spanning every registered surface.
//!
//! ## Philosophy
//!
//! - **Global, not per-block**: operations are ordered by arrival across the
//!   whole document; an undo invoked while block B has focus can restore an
//!   edit that happened in block A
//! - **Linear undo**: recording a new edit discards the redo stack
//! - **Ownership transfer**: an operation lives on exactly one stack at a
//!   time and moves between them on undo/redo, never duplicated
//! - **No self-recording**: restores go through `TextSurface::restore`, which
//!   never queues a content change, so applying history cannot re-enter it
//!
//! ## Design
//!
//! The manager owns the surface registry. Unregistering a block purges all of
//! its operations from both stacks, so a popped operation always names a
//! live surface.

use std::collections::HashMap;

use notebook_types::BlockId;
use text_surface::{ContentChange, CursorPosition, RestoreLayout, TextSurface};

/// Bound on the undo stack; the oldest operation is discarded on overflow
pub const MAX_UNDO_DEPTH: usize = 100;

/// One recorded edit, immutable once recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOperation {
    pub block_id: BlockId,
    pub before_content: String,
    pub after_content: String,
    /// Cursor where the change originated; `None` for host-driven syncs
    pub cursor_before: Option<CursorPosition>,
    /// Monotonic arrival counter, the observable cross-surface order
    pub sequence: u64,
}

/// Result of applying one undo/redo step
///
/// The caller emits the external content-changed notification and re-lays-out
/// the block's view from this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryApplied {
    pub block_id: BlockId,
    pub content: String,
    pub layout: RestoreLayout,
}

/// Diagnostic snapshot of the timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryState {
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub registered_blocks: Vec<BlockId>,
}

/// The global undo/redo manager
#[derive(Default)]
pub struct GlobalHistory {
    surfaces: HashMap<BlockId, TextSurface>,
    undo_stack: Vec<EditOperation>,
    redo_stack: Vec<EditOperation>,
    sequence: u64,
}

impl GlobalHistory {
    /// Creates an empty history with no registered surfaces
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the surface for a block
    pub fn register_surface(&mut self, block_id: BlockId, surface: TextSurface) {
        self.surfaces.insert(block_id, surface);
    }

    /// Unregisters a block's surface and purges its operations
    ///
    /// After this, undo can never resurrect the block's content.
    pub fn unregister_surface(&mut self, block_id: BlockId) -> Option<TextSurface> {
        self.undo_stack.retain(|op| op.block_id != block_id);
        self.redo_stack.retain(|op| op.block_id != block_id);
        self.surfaces.remove(&block_id)
    }

    /// The surface registered for a block, if any
    pub fn surface(&self, block_id: BlockId) -> Option<&TextSurface> {
        self.surfaces.get(&block_id)
    }

    /// Mutable access to a block's surface
    pub fn surface_mut(&mut self, block_id: BlockId) -> Option<&mut TextSurface> {
        self.surfaces.get_mut(&block_id)
    }

    /// True if the block has a registered surface
    pub fn has_surface(&self, block_id: BlockId) -> bool {
        self.surfaces.contains_key(&block_id)
    }

    /// Records a committed content change for a block
    ///
    /// No-op if the content did not actually change. Recording clears the
    /// redo stack: diverging from an undone state discards that future.
    pub fn record_edit(&mut self, block_id: BlockId, change: ContentChange) {
        if change.before == change.after {
            return;
        }
        let sequence = self.sequence;
        self.sequence += 1;
        self.undo_stack.push(EditOperation {
            block_id,
            before_content: change.before,
            after_content: change.after,
            cursor_before: change.cursor_before,
            sequence,
        });
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_DEPTH {
            self.undo_stack.remove(0);
        }
    }

    /// Undoes the most recent edit anywhere in the document
    ///
    /// Restores the owning surface to the operation's before-content with the
    /// cursor clamped to the restored bounds, and moves the operation to the
    /// redo stack. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<HistoryApplied> {
        while let Some(operation) = self.undo_stack.pop() {
            let Some(surface) = self.surfaces.get_mut(&operation.block_id) else {
                continue;
            };
            let layout = surface.restore(&operation.before_content, operation.cursor_before);
            let applied = HistoryApplied {
                block_id: operation.block_id,
                content: operation.before_content.clone(),
                layout,
            };
            self.redo_stack.push(operation);
            return Some(applied);
        }
        None
    }

    /// Redoes the most recently undone edit
    ///
    /// Restores the after-content; without a stored cursor the surface's
    /// last-known cursor and selection are kept, clamped the same way.
    pub fn redo(&mut self) -> Option<HistoryApplied> {
        while let Some(operation) = self.redo_stack.pop() {
            let Some(surface) = self.surfaces.get_mut(&operation.block_id) else {
                continue;
            };
            let layout = surface.restore(&operation.after_content, operation.cursor_before);
            let applied = HistoryApplied {
                block_id: operation.block_id,
                content: operation.after_content.clone(),
                layout,
            };
            self.undo_stack.push(operation);
            return Some(applied);
        }
        None
    }

    /// Number of operations waiting on the undo stack
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of operations waiting on the redo stack
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Diagnostic snapshot: depths and registered blocks
    pub fn state(&self) -> HistoryState {
        HistoryState {
            undo_depth: self.undo_stack.len(),
            redo_depth: self.redo_stack.len(),
            registered_blocks: self.surfaces.keys().copied().collect(),
        }
    }

    /// Drops all recorded operations, keeping the surfaces
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
