#![no_std]

//! # Text Surface
//!
//! The editable view bound to one block's content.
//!
//! ## Philosophy
//!
//! - **No_std compatible**: uses alloc but not std
//! - **Views, not owners**: the document model is the source of truth for
//!   block existence; a surface only holds the live editing state
//! - **Explicit notifications**: every committed edit queues a content-change
//!   record for the caller to drain; nothing fires callbacks
//! - **Suppressed replays**: programmatic restores (undo/redo) never queue
//!   change records, so history application cannot re-enter history
//!
//! ## Design
//!
//! The crate provides:
//! - `TextBuffer`: line-based text storage with 1-based addressing
//! - `CursorPosition` / `Selection`: clamped, 1-based coordinates
//! - `TextSurface`: content + cursor + selection + change queue + layout

extern crate alloc;

pub mod buffer;
pub mod cursor;
pub mod surface;

pub use buffer::TextBuffer;
pub use cursor::{CursorPosition, Selection};
pub use surface::{ContentChange, RestoreLayout, TextSurface, DEFAULT_LINE_HEIGHT};
