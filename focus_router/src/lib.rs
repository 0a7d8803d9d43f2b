//! # Focus Router
//!
//! Tracks which block currently owns keyboard input and resolves the
//! "current block" for commands regardless of focus state.
//!
//! ## Philosophy
//!
//! - **Focus vs. selection**: focus means active text editing inside a
//!   surface; selection means keyboard-navigable "current block" without
//!   editing. Navigation keys apply only while no surface has text focus
//! - **Explicit transitions**: every change goes through a named transition;
//!   stale block ids are defined no-ops, never errors
//! - **Auditable**: transitions are recorded for diagnostics and tests
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A window manager or DOM focus implementation
//! - The keyboard chord table (see `keymap`)

use document_model::DocumentModel;
use notebook_types::BlockId;
use serde::{Deserialize, Serialize};

/// Focus state of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusState {
    /// No block is current
    Unfocused,
    /// A surface has text focus; edit keys belong to it
    SurfaceFocused(BlockId),
    /// A block is selected but not being text-edited
    BlockSelected(BlockId),
}

/// Audit record of one focus transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusEvent {
    SurfaceFocused { block_id: BlockId, sequence: u64 },
    BlockSelected { block_id: BlockId, sequence: u64 },
    Cleared { sequence: u64 },
}

/// What pressing Enter on a selected block asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterAction {
    /// The block already renders as an editor; focus moved to its surface
    FocusSurface(BlockId),
    /// The block is prose rendered statically; the host must materialize an
    /// editable surface and answer with a focus-block message
    RequestSurface(BlockId),
}

/// Arrow-key navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateDirection {
    Up,
    Down,
}

/// The focus state machine
#[derive(Debug, Default)]
pub struct FocusRouter {
    state: FocusState,
    audit_trail: Vec<FocusEvent>,
    sequence: u64,
}

impl Default for FocusState {
    fn default() -> Self {
        FocusState::Unfocused
    }
}

impl FocusRouter {
    /// Creates a router with nothing focused
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> FocusState {
        self.state
    }

    /// True while a surface owns text focus
    pub fn is_surface_focused(&self) -> bool {
        matches!(self.state, FocusState::SurfaceFocused(_))
    }

    /// Resolves the block commands should apply to
    ///
    /// The focused surface's block wins; otherwise the selected block;
    /// otherwise none, and commands requiring a current block no-op.
    pub fn current_block_id(&self) -> Option<BlockId> {
        match self.state {
            FocusState::Unfocused => None,
            FocusState::SurfaceFocused(id) | FocusState::BlockSelected(id) => Some(id),
        }
    }

    /// A surface gained text focus (click, host focus-block, undo focus)
    pub fn focus_surface(&mut self, block_id: BlockId) {
        if self.state == FocusState::SurfaceFocused(block_id) {
            return;
        }
        self.state = FocusState::SurfaceFocused(block_id);
        let sequence = self.next_sequence();
        self.audit_trail.push(FocusEvent::SurfaceFocused { block_id, sequence });
    }

    /// A block was selected without entering its text (click on static block)
    pub fn select_block(&mut self, block_id: BlockId) {
        if self.state == FocusState::BlockSelected(block_id) {
            return;
        }
        self.state = FocusState::BlockSelected(block_id);
        let sequence = self.next_sequence();
        self.audit_trail.push(FocusEvent::BlockSelected { block_id, sequence });
    }

    /// Escape: leave text editing but keep the block selected
    ///
    /// Returns true if the state changed.
    pub fn escape(&mut self) -> bool {
        match self.state {
            FocusState::SurfaceFocused(id) => {
                self.select_block(id);
                true
            }
            _ => false,
        }
    }

    /// Enter on the selected block: start text editing
    ///
    /// Code blocks focus immediately. Prose blocks render statically, so the
    /// transition is a request; the state stays `BlockSelected` until the
    /// host materializes the surface and answers with focus-block.
    pub fn enter(&mut self, document: &DocumentModel) -> Option<EnterAction> {
        let FocusState::BlockSelected(id) = self.state else {
            return None;
        };
        let block = document.block(id)?;
        if block.kind.is_runnable() {
            self.focus_surface(id);
            Some(EnterAction::FocusSurface(id))
        } else {
            Some(EnterAction::RequestSurface(id))
        }
    }

    /// Arrow navigation over document order
    ///
    /// Active only while no surface has text focus. With no selection the
    /// first block becomes selected. No-op at document boundaries. Returns
    /// the newly selected block when the selection moved.
    pub fn navigate(
        &mut self,
        direction: NavigateDirection,
        document: &DocumentModel,
    ) -> Option<BlockId> {
        match self.state {
            FocusState::SurfaceFocused(_) => None,
            FocusState::Unfocused => {
                let first = document.first_block()?;
                self.select_block(first);
                Some(first)
            }
            FocusState::BlockSelected(current) => {
                let target = match direction {
                    NavigateDirection::Up => document.previous_block(current),
                    NavigateDirection::Down => document.next_block(current),
                }?;
                self.select_block(target);
                Some(target)
            }
        }
    }

    /// A block was removed; fall back to a surviving neighbor if the removed
    /// block was current
    pub fn block_removed(&mut self, block_id: BlockId, fallback: Option<BlockId>) {
        if self.current_block_id() != Some(block_id) {
            return;
        }
        match fallback {
            Some(neighbor) => self.select_block(neighbor),
            None => {
                self.state = FocusState::Unfocused;
                let sequence = self.next_sequence();
                self.audit_trail.push(FocusEvent::Cleared { sequence });
            }
        }
    }

    /// The audit trail of transitions
    pub fn audit_trail(&self) -> &[FocusEvent] {
        &self.audit_trail
    }

    fn next_sequence(&mut self) -> u64 {
        let sequence = self.sequence;
        self.sequence += 1;
        sequence
    }
}
