//! # Host Protocol
//!
//! The typed message boundary between the editing core and its host: the
//! embedding view on one side, the language runtime on the other.
//!
//! ## Philosophy
//!
//! - **Typed, not stringly**: every message kind has a payload struct and a
//!   single dispatch point; no code anywhere can raise an arbitrary event
//! - **Versioned**: every envelope carries a schema version checked on
//!   receipt, so the boundary can evolve without silent misparses
//! - **At-least-once tolerant**: receivers treat duplicate deliveries as
//!   stale-but-harmless; nothing here deduplicates
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A transport (the host moves envelopes however it likes)
//! - The runtime itself (execution happens on the far side)

pub mod envelope;
pub mod messages;

pub use envelope::{Envelope, MessageId, ProtocolError, SchemaVersion, PROTOCOL_SCHEMA_VERSION};
pub use messages::{
    ContentChanged, CursorMoved, ExecutionStats, FocusBlock, FocusBlockRequest, InboundMessage,
    OutboundMessage, RunRequest, ScrollToBlock, ACTION_CONTENT_CHANGED, ACTION_CURSOR_MOVED,
    ACTION_EXECUTION_STATS, ACTION_FOCUS_BLOCK, ACTION_FOCUS_BLOCK_REQUEST, ACTION_RUN_REQUEST,
    ACTION_SCROLL_TO_BLOCK, ACTION_SCROLL_TO_LAST_RESULT,
};
