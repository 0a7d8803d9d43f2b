//! Structured session log
//!
//! Logging is explicit and structured, not text-based or printf-style.
//! Entries land in a bounded in-memory buffer the host can render in its
//! logs panel.

use notebook_types::BlockId;

/// Bound on retained entries; the oldest entry is discarded on overflow
pub const MAX_LOG_ENTRIES: usize = 512;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational messages
    Info,
    /// Warnings
    Warn,
    /// Errors
    Error,
}

/// A structured log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Block the entry concerns (if any)
    pub block: Option<BlockId>,
    /// Log message
    pub message: String,
    /// Structured fields
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Creates a new log entry
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            block: None,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Sets the block this entry concerns
    pub fn with_block(mut self, block: BlockId) -> Self {
        self.block = Some(block);
        self
    }

    /// Adds a field to the log entry
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }
}

/// Bounded buffer of session log entries
#[derive(Debug, Default)]
pub struct SessionLog {
    entries: Vec<LogEntry>,
}

impl SessionLog {
    /// Creates an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry, discarding the oldest at capacity
    pub fn record(&mut self, entry: LogEntry) {
        self.entries.push(entry);
        if self.entries.len() > MAX_LOG_ENTRIES {
            self.entries.remove(0);
        }
    }

    /// All retained entries, oldest first
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries at or above a level, oldest first
    pub fn entries_at_least(&self, level: LogLevel) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.level >= level)
    }
}
