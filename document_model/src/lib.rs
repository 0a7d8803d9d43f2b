//! # Document Model
//!
//! The ordered list of blocks that makes up one notebook document.
//!
//! ## Philosophy
//!
//! - **Single source of truth**: the document owns block existence and
//!   authoritative content; text surfaces are views over it
//! - **Stable identity, mutable order**: ids never change or get reused;
//!   position changes on insertion, removal, and moves
//! - **Edit provenance**: block content changes flow in through surface
//!   flushes, never by direct field assignment, so the history timeline sees
//!   every edit
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A persistence format (loading and saving live with the host)
//! - The removal cascade (history/decoration/dispatch purges are
//!   coordinated by the session that owns all the components)

use notebook_types::{BlockId, BlockKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Document model error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Unknown block: {0}")]
    UnknownBlock(BlockId),

    #[error("Position {position} out of range for {len} blocks")]
    PositionOutOfRange { position: usize, len: usize },
}

/// One unit of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Stable identity, unique within the document and never reused
    pub id: BlockId,
    /// Closed variant: code or prose
    pub kind: BlockKind,
    /// Authoritative content, updated by surface flushes
    pub content: String,
}

impl Block {
    fn new(kind: BlockKind, content: String) -> Self {
        Self {
            id: BlockId::new(),
            kind,
            content,
        }
    }
}

/// Where to insert a new block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Directly after an existing block
    AfterBlock(BlockId),
    /// At the end of the document
    AtEnd,
}

/// The ordered sequence of blocks
///
/// Order is the vector order: dense, total, no duplicates. Block order is
/// also execution order.
#[derive(Debug, Default)]
pub struct DocumentModel {
    blocks: Vec<Block>,
}

impl DocumentModel {
    /// Creates an empty document
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Inserts a new block and returns its id
    pub fn insert_block(
        &mut self,
        kind: BlockKind,
        content: impl Into<String>,
        position: InsertPosition,
    ) -> Result<BlockId, DocumentError> {
        let block = Block::new(kind, content.into());
        let id = block.id;
        match position {
            InsertPosition::AtEnd => self.blocks.push(block),
            InsertPosition::AfterBlock(after) => {
                let index = self.index_of(after).ok_or(DocumentError::UnknownBlock(after))?;
                self.blocks.insert(index + 1, block);
            }
        }
        Ok(id)
    }

    /// Removes a block, returning it
    ///
    /// The caller is responsible for the removal cascade (history purge,
    /// decoration purge, dispatch cancellation).
    pub fn remove_block(&mut self, id: BlockId) -> Result<Block, DocumentError> {
        let index = self.index_of(id).ok_or(DocumentError::UnknownBlock(id))?;
        Ok(self.blocks.remove(index))
    }

    /// Moves a block to a new position in the order
    pub fn move_block(&mut self, id: BlockId, to_position: usize) -> Result<(), DocumentError> {
        let index = self.index_of(id).ok_or(DocumentError::UnknownBlock(id))?;
        if to_position >= self.blocks.len() {
            return Err(DocumentError::PositionOutOfRange {
                position: to_position,
                len: self.blocks.len(),
            });
        }
        let block = self.blocks.remove(index);
        self.blocks.insert(to_position, block);
        Ok(())
    }

    /// All blocks in document order
    pub fn ordered_blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Looks up a block by id
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.index_of(id).map(|i| &self.blocks[i])
    }

    /// Position of a block in the order
    pub fn index_of(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True if the document has no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Id of the block before `id` in document order
    pub fn previous_block(&self, id: BlockId) -> Option<BlockId> {
        let index = self.index_of(id)?;
        index.checked_sub(1).map(|i| self.blocks[i].id)
    }

    /// Id of the block after `id` in document order
    pub fn next_block(&self, id: BlockId) -> Option<BlockId> {
        let index = self.index_of(id)?;
        self.blocks.get(index + 1).map(|b| b.id)
    }

    /// Id of the first block, if any
    pub fn first_block(&self) -> Option<BlockId> {
        self.blocks.first().map(|b| b.id)
    }

    /// Flushes edited content from a surface into the model
    ///
    /// Returns true if the content actually changed.
    pub fn flush_content(&mut self, id: BlockId, content: &str) -> Result<bool, DocumentError> {
        let index = self.index_of(id).ok_or(DocumentError::UnknownBlock(id))?;
        if self.blocks[index].content == content {
            return Ok(false);
        }
        self.blocks[index].content = content.to_string();
        Ok(true)
    }
}
