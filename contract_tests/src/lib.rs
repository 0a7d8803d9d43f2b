//! # Contract Tests
//!
//! This crate provides "golden" tests for the editor core's observable
//! behavior to ensure it doesn't drift accidentally over time.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: observable contracts are written as code
//! - **End to end**: scenarios drive a whole session the way a host would,
//!   through key events and protocol envelopes
//! - **Wire stability**: action identifiers, schema versions and payload
//!   field names are pinned so hosts never break silently
//!
//! ## Structure
//!
//! - `protocol`: envelope structure, action identifiers, payload shapes
//! - `editing`: cross-block undo/redo timeline scenarios
//! - `execution`: dispatch ordering, stats delivery and decorations

pub mod editing;
pub mod execution;
pub mod protocol;
