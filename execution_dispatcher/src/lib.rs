//! # Execution Dispatcher
//!
//! Turns a run-intent into an ordered sequence of block executions and
//! tracks per-block execution state.
//!
//! ## Philosophy
//!
//! - **Document order is execution order**: multi-target modes always run
//!   blocks in their current document order
//! - **Flush before run**: each target's latest surface content is flushed
//!   into the document model before dispatch, so stale content never executes
//! - **No double dispatch**: a block already in flight rejects new requests
//!   instead of queueing duplicates
//! - **Stale results are dropped**: completions for unknown or idle blocks
//!   are ignored, never errors
//!
//! ## Design
//!
//! The dispatcher computes the target list, flushes content through the
//! `SurfaceContent` seam, marks targets `Pending`, and hands back one
//! `RunTarget` per block for the caller to emit to the runtime. Stats that
//! arrive while a block is in flight are buffered and released to the caller
//! on completion.

use std::collections::HashMap;

use document_model::DocumentModel;
use notebook_types::{BlockId, ExecutionStatus, LineStat, RunMode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Dispatch error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Unknown block: {0}")]
    UnknownBlock(BlockId),

    #[error("Block already in flight: {0}")]
    AlreadyInFlight(BlockId),

    #[error("No runnable target")]
    NoRunnableTarget,
}

/// Execution state of one block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionState {
    /// Not executing and nothing queued
    Idle,
    /// Dispatched to the runtime, not yet started
    Pending,
    /// The runtime reported the block as started
    Running,
}

impl ExecutionState {
    /// True while the block occupies the runtime
    pub fn is_in_flight(&self) -> bool {
        matches!(self, ExecutionState::Pending | ExecutionState::Running)
    }
}

/// One block execution the caller must emit to the runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTarget {
    pub block_id: BlockId,
    /// The flushed code at dispatch time
    pub code: String,
}

/// An ordered execution request, created per run-intent and not persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub mode: RunMode,
    pub targets: Vec<RunTarget>,
}

/// Result of one completed block execution
///
/// Carries the stats buffered while the block was in flight, released for
/// the decoration layer to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub block_id: BlockId,
    pub status: ExecutionStatus,
    pub stats: Vec<LineStat>,
}

/// Seam through which the dispatcher reads the latest edited content
///
/// Implemented by whoever owns the text surfaces. Returning `None` means the
/// block has no live surface; the document model's content is used instead.
pub trait SurfaceContent {
    fn latest_content(&self, block_id: BlockId) -> Option<String>;
}

/// Tracks execution state and plans ordered dispatches
#[derive(Debug, Default)]
pub struct ExecutionDispatcher {
    states: HashMap<BlockId, ExecutionState>,
    buffered_stats: HashMap<BlockId, Vec<LineStat>>,
}

impl ExecutionDispatcher {
    /// Creates a dispatcher with no blocks in flight
    pub fn new() -> Self {
        Self::default()
    }

    /// Execution state of a block; unknown blocks are `Idle`
    pub fn state(&self, block_id: BlockId) -> ExecutionState {
        self.states
            .get(&block_id)
            .copied()
            .unwrap_or(ExecutionState::Idle)
    }

    /// Computes the ordered target list for a run-intent
    ///
    /// Prose blocks are skipped: only code blocks execute. `RunBlockOnly`
    /// yields the invoking block alone; `RunUpToBlock` everything from the
    /// document start through the invoking block; `RunAllFromTop` the whole
    /// document regardless of the invoking block.
    pub fn plan(
        &self,
        mode: RunMode,
        block_id: BlockId,
        document: &DocumentModel,
    ) -> Result<Vec<BlockId>, DispatchError> {
        let invoking = document
            .index_of(block_id)
            .ok_or(DispatchError::UnknownBlock(block_id))?;
        let targets: Vec<BlockId> = match mode {
            RunMode::RunBlockOnly => document.ordered_blocks()[invoking..=invoking]
                .iter()
                .filter(|b| b.kind.is_runnable())
                .map(|b| b.id)
                .collect(),
            RunMode::RunUpToBlock => document.ordered_blocks()[..=invoking]
                .iter()
                .filter(|b| b.kind.is_runnable())
                .map(|b| b.id)
                .collect(),
            RunMode::RunAllFromTop => document
                .ordered_blocks()
                .iter()
                .filter(|b| b.kind.is_runnable())
                .map(|b| b.id)
                .collect(),
        };
        if targets.is_empty() {
            return Err(DispatchError::NoRunnableTarget);
        }
        Ok(targets)
    }

    /// Plans, flushes, and marks a run-intent for dispatch
    ///
    /// Every target's latest surface content is flushed into the document
    /// model first, then all targets transition to `Pending`. A target
    /// already in flight rejects the whole request; no partial dispatch.
    pub fn dispatch<S: SurfaceContent>(
        &mut self,
        mode: RunMode,
        block_id: BlockId,
        document: &mut DocumentModel,
        surfaces: &S,
    ) -> Result<ExecutionRequest, DispatchError> {
        let target_ids = self.plan(mode, block_id, document)?;

        for id in &target_ids {
            if self.state(*id).is_in_flight() {
                return Err(DispatchError::AlreadyInFlight(*id));
            }
        }

        let mut targets = Vec::with_capacity(target_ids.len());
        for id in target_ids {
            if let Some(latest) = surfaces.latest_content(id) {
                document
                    .flush_content(id, &latest)
                    .map_err(|_| DispatchError::UnknownBlock(id))?;
            }
            let code = document
                .block(id)
                .ok_or(DispatchError::UnknownBlock(id))?
                .content
                .clone();
            self.states.insert(id, ExecutionState::Pending);
            targets.push(RunTarget { block_id: id, code });
        }

        Ok(ExecutionRequest { mode, targets })
    }

    /// The runtime reported a block as started
    ///
    /// Only meaningful for a `Pending` block; anything else is a stale
    /// signal and is dropped.
    pub fn mark_running(&mut self, block_id: BlockId) -> bool {
        if self.state(block_id) == ExecutionState::Pending {
            self.states.insert(block_id, ExecutionState::Running);
            true
        } else {
            false
        }
    }

    /// Buffers line stats for a block in flight
    ///
    /// Stats for an idle or unknown block are dropped. Returns the number of
    /// stats accepted.
    pub fn buffer_stats(&mut self, block_id: BlockId, stats: Vec<LineStat>) -> usize {
        if !self.state(block_id).is_in_flight() {
            return 0;
        }
        let accepted = stats.len();
        self.buffered_stats.entry(block_id).or_default().extend(stats);
        accepted
    }

    /// The runtime reported a block execution as finished
    ///
    /// The block returns to `Idle` and its buffered stats are released.
    /// Completions for blocks not in flight are stale and yield `None`.
    pub fn complete(
        &mut self,
        block_id: BlockId,
        status: ExecutionStatus,
    ) -> Option<CompletionOutcome> {
        if !self.state(block_id).is_in_flight() {
            return None;
        }
        self.states.insert(block_id, ExecutionState::Idle);
        let stats = self.buffered_stats.remove(&block_id).unwrap_or_default();
        Some(CompletionOutcome {
            block_id,
            status,
            stats,
        })
    }

    /// Cancels tracking for a removed block
    ///
    /// Queued state and buffered stats are discarded. An execution already
    /// dispatched to the runtime cannot be cancelled; its eventual completion
    /// will arrive for an unknown block and be dropped as stale.
    pub fn cancel(&mut self, block_id: BlockId) {
        self.states.remove(&block_id);
        self.buffered_stats.remove(&block_id);
    }

    /// Ids of all blocks currently in flight
    pub fn in_flight(&self) -> Vec<BlockId> {
        self.states
            .iter()
            .filter(|(_, state)| state.is_in_flight())
            .map(|(id, _)| *id)
            .collect()
    }
}
