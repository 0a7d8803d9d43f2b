//! # Notebook Types
//!
//! This crate defines the foundational value types shared by every part of
//! the notebook editing core.
//!
//! ## Philosophy
//!
//! - **Stable identity**: blocks are addressed by ids that survive edits and
//!   reordering, never by position
//! - **Wire-visible**: everything here is serializable; the host protocol and
//!   tests inject these types directly
//! - **No behavior**: this crate holds data shapes only; the components that
//!   act on them live in their own crates
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - The document itself (see `document_model`)
//! - Editor buffer types (see `text_surface`)
//! - The host message envelope (see `host_protocol`)

pub mod ids;
pub mod outcome;
pub mod run;

pub use ids::BlockId;
pub use outcome::{ExecutionStatus, LineStat, OutcomeClass};
pub use run::{BlockKind, RunMode};
