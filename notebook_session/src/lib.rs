//! # Notebook Session
//!
//! The composition root: one session owns the document, the surfaces, the
//! global history, focus, execution tracking and decorations, and exposes
//! the host-facing surface of the whole editor core.
//!
//! ## Philosophy
//!
//! - **One owner**: every sub-system is a plain value owned by the session;
//!   there is no shared mutable state and no interior mutability
//! - **Queues, not callbacks**: outbound messages and view effects accumulate
//!   in queues the host drains after each call; nothing is pushed to the host
//! - **Keys in, messages out**: the host feeds key events and inbound
//!   envelopes; everything the core wants from the outside world leaves as a
//!   typed message
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A rendering layer (the host owns pixels; the core owns state)
//! - A language runtime (execution happens on the far side of the protocol)

mod log;
mod session;

pub use log::{LogEntry, LogLevel, SessionLog, MAX_LOG_ENTRIES};
pub use session::{NotebookSession, SessionError, ViewEffect};
