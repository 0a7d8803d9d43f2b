//! The notebook session

use std::mem;

use decoration_index::DecorationIndex;
use document_model::{Block, DocumentError, DocumentModel, InsertPosition};
use execution_dispatcher::{
    DispatchError, ExecutionDispatcher, ExecutionRequest, ExecutionState, SurfaceContent,
};
use focus_router::{EnterAction, FocusRouter, FocusState, NavigateDirection};
use history_manager::GlobalHistory;
use host_protocol::{
    ContentChanged, CursorMoved, Envelope, FocusBlockRequest, InboundMessage, OutboundMessage,
    ProtocolError, RunRequest,
};
use keymap::{EditorIntent, KeyEvent, PanelTab};
use notebook_types::{BlockId, BlockKind, RunMode};
use text_surface::{ContentChange, CursorPosition, RestoreLayout, TextSurface};
use thiserror::Error;

use crate::log::{LogEntry, LogLevel, SessionLog};

/// Session error types
#[derive(Debug, Error)]
pub enum SessionError {
    /// A command needing a current block ran with nothing focused or selected
    #[error("No current block")]
    NoCurrentBlock,

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Presentational work the host performs after draining the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEffect {
    /// Bring a block into view
    ScrollToBlock(BlockId),
    /// Bring the newest result entry into view
    ScrollToLastResult,
    /// Reveal a side panel tab
    ShowPanelTab(PanelTab),
    /// Re-lay-out a block's view after a programmatic restore
    Relayout {
        block_id: BlockId,
        layout: RestoreLayout,
    },
}

/// Read-only view of the surface registry for content flushing
struct SurfaceRegistry<'a>(&'a GlobalHistory);

impl SurfaceContent for SurfaceRegistry<'_> {
    fn latest_content(&self, block_id: BlockId) -> Option<String> {
        self.0.surface(block_id).map(|s| s.content())
    }
}

/// One open notebook: the composition root of the editor core
#[derive(Default)]
pub struct NotebookSession {
    document: DocumentModel,
    history: GlobalHistory,
    focus: FocusRouter,
    dispatcher: ExecutionDispatcher,
    decorations: DecorationIndex,
    outbound: Vec<OutboundMessage>,
    effects: Vec<ViewEffect>,
    log: SessionLog,
}

impl NotebookSession {
    /// Creates an empty session
    pub fn new() -> Self {
        Self::default()
    }

    // --- document structure ---

    /// Inserts a block and registers its editing surface
    pub fn insert_block(
        &mut self,
        kind: BlockKind,
        content: &str,
        position: InsertPosition,
    ) -> Result<BlockId, SessionError> {
        let id = self.document.insert_block(kind, content, position)?;
        self.history.register_surface(id, TextSurface::new(content));
        self.log.record(
            LogEntry::new(LogLevel::Debug, "block inserted")
                .with_block(id)
                .with_field("kind", format!("{kind:?}")),
        );
        Ok(id)
    }

    /// Removes a block and every trace of it
    ///
    /// History operations, decorations and queued execution state for the
    /// block are discarded; focus falls back to a surviving neighbor.
    pub fn remove_block(&mut self, id: BlockId) -> Result<Block, SessionError> {
        let fallback = self
            .document
            .previous_block(id)
            .or_else(|| self.document.next_block(id));
        let block = self.document.remove_block(id)?;
        self.history.unregister_surface(id);
        self.decorations.remove_block(id);
        self.dispatcher.cancel(id);
        self.focus.block_removed(id, fallback);
        self.log
            .record(LogEntry::new(LogLevel::Info, "block removed").with_block(id));
        Ok(block)
    }

    /// Reorders a block to a new document position
    pub fn move_block(&mut self, id: BlockId, to_position: usize) -> Result<(), SessionError> {
        self.document.move_block(id, to_position)?;
        Ok(())
    }

    // --- editing ---

    /// The editing surface of a block
    pub fn surface(&self, id: BlockId) -> Option<&TextSurface> {
        self.history.surface(id)
    }

    /// Mutable access to a block's editing surface for text input
    pub fn surface_mut(&mut self, id: BlockId) -> Option<&mut TextSurface> {
        self.history.surface_mut(id)
    }

    /// Moves a surface's cursor, reporting the movement while focused
    pub fn move_cursor(&mut self, id: BlockId, position: CursorPosition) -> bool {
        let Some(surface) = self.history.surface_mut(id) else {
            return false;
        };
        surface.set_cursor(position);
        if self.focus.state() == FocusState::SurfaceFocused(id) {
            self.outbound
                .push(OutboundMessage::CursorMoved(CursorMoved { block_id: id }));
        }
        true
    }

    /// Commits every pending surface change
    ///
    /// Pending changes from all surfaces are merged by arrival stamp, so
    /// edits to different blocks land on the timeline in the order they
    /// happened rather than in document order. Each change is recorded in
    /// the global history, flushed into the document model and announced as
    /// a content-changed message. Returns the number of committed changes.
    pub fn commit_changes(&mut self) -> usize {
        let ids: Vec<BlockId> = self.document.ordered_blocks().iter().map(|b| b.id).collect();
        let mut pending: Vec<(BlockId, ContentChange)> = Vec::new();
        for id in ids {
            if let Some(surface) = self.history.surface_mut(id) {
                pending.extend(surface.take_changes().into_iter().map(|c| (id, c)));
            }
        }
        pending.sort_by_key(|(_, change)| change.stamp);
        let mut committed = 0;
        for (id, change) in pending {
            if self.document.flush_content(id, &change.after).is_err() {
                continue;
            }
            self.outbound.push(OutboundMessage::ContentChanged(ContentChanged {
                block_id: id,
                content: change.after.clone(),
            }));
            self.history.record_edit(id, change);
            committed += 1;
        }
        committed
    }

    // --- history ---

    /// Undoes the most recent edit anywhere in the document
    ///
    /// Pending changes are committed first so the newest edit is undoable.
    /// The restored block's surface gains focus and the host is told about
    /// the content change and the layout to re-apply.
    pub fn undo(&mut self) -> Option<BlockId> {
        self.commit_changes();
        let applied = self.history.undo()?;
        self.finish_restore(applied.block_id, applied.content, applied.layout);
        Some(applied.block_id)
    }

    /// Redoes the most recently undone edit
    pub fn redo(&mut self) -> Option<BlockId> {
        self.commit_changes();
        let applied = self.history.redo()?;
        self.finish_restore(applied.block_id, applied.content, applied.layout);
        Some(applied.block_id)
    }

    fn finish_restore(&mut self, block_id: BlockId, content: String, layout: RestoreLayout) {
        // The surface already holds the restored text; mirror it everywhere else
        let _ = self.document.flush_content(block_id, &content);
        self.outbound.push(OutboundMessage::ContentChanged(ContentChanged {
            block_id,
            content,
        }));
        self.focus.focus_surface(block_id);
        self.outbound
            .push(OutboundMessage::CursorMoved(CursorMoved { block_id }));
        self.effects.push(ViewEffect::Relayout { block_id, layout });
    }

    // --- execution ---

    /// Runs from the current block according to the mode
    ///
    /// Pending changes are committed first, then each target's latest content
    /// is flushed and dispatched as a run-request message in document order.
    pub fn run_block(&mut self, mode: RunMode) -> Result<ExecutionRequest, SessionError> {
        self.commit_changes();
        let block_id = self
            .focus
            .current_block_id()
            .ok_or(SessionError::NoCurrentBlock)?;
        let request = self.dispatcher.dispatch(
            mode,
            block_id,
            &mut self.document,
            &SurfaceRegistry(&self.history),
        )?;
        for target in &request.targets {
            self.outbound.push(OutboundMessage::RunRequest(RunRequest {
                block_id: target.block_id,
                code: target.code.clone(),
                mode,
            }));
        }
        self.log.record(
            LogEntry::new(LogLevel::Info, "run dispatched")
                .with_block(block_id)
                .with_field("targets", request.targets.len().to_string()),
        );
        Ok(request)
    }

    /// Execution state of a block
    pub fn execution_state(&self, id: BlockId) -> ExecutionState {
        self.dispatcher.state(id)
    }

    /// The runtime reported a block as started
    pub fn mark_running(&mut self, id: BlockId) -> bool {
        self.dispatcher.mark_running(id)
    }

    // --- input ---

    /// Routes a key event through the chord table
    ///
    /// Returns true when the event mapped to an intent and was consumed;
    /// false means the host should deliver it to the focused surface as
    /// ordinary text input. Escape is consumed only when it actually left a
    /// surface, so hosts can forward idle Escapes upstream. Failed run
    /// intents are logged, not surfaced.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        let Some(intent) = keymap::resolve(event, self.focus.is_surface_focused()) else {
            return false;
        };
        match intent {
            EditorIntent::RunCurrent => {
                self.run_logged(RunMode::RunBlockOnly);
            }
            EditorIntent::RunCurrentAndAdvance => {
                if self.run_logged(RunMode::RunBlockOnly) {
                    self.advance_selection();
                }
            }
            EditorIntent::RunAllFromTop => {
                self.run_logged(RunMode::RunAllFromTop);
            }
            EditorIntent::Undo => {
                self.undo();
            }
            EditorIntent::Redo => {
                self.redo();
            }
            EditorIntent::ExitSurface => return self.focus.escape(),
            EditorIntent::EnterSelected => match self.focus.enter(&self.document) {
                Some(EnterAction::FocusSurface(id)) => {
                    self.outbound
                        .push(OutboundMessage::CursorMoved(CursorMoved { block_id: id }));
                }
                Some(EnterAction::RequestSurface(id)) => {
                    self.outbound.push(OutboundMessage::FocusBlockRequest(
                        FocusBlockRequest { block_id: id },
                    ));
                }
                None => {}
            },
            EditorIntent::SelectPrevious => {
                self.focus.navigate(NavigateDirection::Up, &self.document);
            }
            EditorIntent::SelectNext => {
                self.focus.navigate(NavigateDirection::Down, &self.document);
            }
            EditorIntent::ShowPanelTab(tab) => {
                self.effects.push(ViewEffect::ShowPanelTab(tab));
            }
        }
        true
    }

    fn run_logged(&mut self, mode: RunMode) -> bool {
        match self.run_block(mode) {
            Ok(_) => true,
            Err(err) => {
                self.log
                    .record(LogEntry::new(LogLevel::Warn, err.to_string()));
                false
            }
        }
    }

    fn advance_selection(&mut self) {
        let Some(current) = self.focus.current_block_id() else {
            return;
        };
        let Some(next) = self.document.next_block(current) else {
            return;
        };
        if self.focus.is_surface_focused() {
            self.focus.focus_surface(next);
            self.outbound
                .push(OutboundMessage::CursorMoved(CursorMoved { block_id: next }));
        } else {
            self.focus.select_block(next);
        }
        self.effects.push(ViewEffect::ScrollToBlock(next));
    }

    // --- host protocol ---

    /// Applies one inbound host envelope
    ///
    /// Messages naming blocks the session no longer knows are stale and are
    /// dropped with a log entry; malformed envelopes are errors.
    pub fn handle_inbound(&mut self, envelope: &Envelope) -> Result<(), SessionError> {
        match InboundMessage::from_envelope(envelope)? {
            InboundMessage::ExecutionStats(payload) => {
                self.dispatcher.buffer_stats(payload.block_id, payload.stats);
                match self.dispatcher.complete(payload.block_id, payload.status) {
                    Some(outcome) => {
                        let line_count = self.block_line_count(outcome.block_id);
                        let applied = self.decorations.apply_stats(
                            outcome.block_id,
                            &outcome.stats,
                            line_count,
                        );
                        self.log.record(
                            LogEntry::new(LogLevel::Info, "execution finished")
                                .with_block(outcome.block_id)
                                .with_field("status", outcome.status.to_string())
                                .with_field("applied", applied.applied.to_string())
                                .with_field("dropped", applied.dropped.to_string()),
                        );
                    }
                    None => {
                        self.log.record(
                            LogEntry::new(LogLevel::Warn, "stale execution stats")
                                .with_block(payload.block_id),
                        );
                    }
                }
            }
            InboundMessage::FocusBlock(payload) => {
                if self.document.block(payload.block_id).is_some() {
                    self.focus.focus_surface(payload.block_id);
                    self.outbound.push(OutboundMessage::CursorMoved(CursorMoved {
                        block_id: payload.block_id,
                    }));
                } else {
                    self.log.record(
                        LogEntry::new(LogLevel::Warn, "focus-block for unknown block")
                            .with_block(payload.block_id),
                    );
                }
            }
            InboundMessage::ScrollToBlock(payload) => {
                if self.document.block(payload.block_id).is_some() {
                    self.effects.push(ViewEffect::ScrollToBlock(payload.block_id));
                }
            }
            InboundMessage::ScrollToLastResult => {
                self.effects.push(ViewEffect::ScrollToLastResult);
            }
        }
        Ok(())
    }

    /// Drains the queued outbound messages
    pub fn take_outbound(&mut self) -> Vec<OutboundMessage> {
        mem::take(&mut self.outbound)
    }

    /// Drains the queued view effects
    pub fn take_effects(&mut self) -> Vec<ViewEffect> {
        mem::take(&mut self.effects)
    }

    // --- views ---

    /// The document model
    pub fn document(&self) -> &DocumentModel {
        &self.document
    }

    /// Current focus state
    pub fn focus_state(&self) -> FocusState {
        self.focus.state()
    }

    /// The decoration sets
    pub fn decorations(&self) -> &DecorationIndex {
        &self.decorations
    }

    /// Mutable access to the decoration sets (line highlighting)
    pub fn decorations_mut(&mut self) -> &mut DecorationIndex {
        &mut self.decorations
    }

    /// The global undo/redo history
    pub fn history(&self) -> &GlobalHistory {
        &self.history
    }

    /// The session log
    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    /// Focus helper for hosts that move focus by pointer
    pub fn focus_block(&mut self, id: BlockId) {
        self.focus.focus_surface(id);
        self.outbound
            .push(OutboundMessage::CursorMoved(CursorMoved { block_id: id }));
    }

    /// Selection helper for hosts that select by pointer
    pub fn select_block(&mut self, id: BlockId) {
        self.focus.select_block(id);
    }

    // Every block keeps a surface from insert to removal, so line geometry
    // always comes from the buffer.
    fn block_line_count(&self, id: BlockId) -> u32 {
        self.history
            .surface(id)
            .map(|s| s.line_count())
            .unwrap_or(0)
    }
}
