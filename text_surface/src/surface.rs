//! The editable surface bound to one block
//!
//! A surface owns the live editing state: buffer, cursor, selection, and the
//! queue of committed content changes that the owner drains and feeds to the
//! history timeline and the document model.

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::buffer::TextBuffer;
use crate::cursor::{CursorPosition, Selection};

/// Default line height in pixels, matching the embedding editor's font setup
pub const DEFAULT_LINE_HEIGHT: u32 = 19;

/// Process-wide arrival counter; every committed change takes the next value
static ARRIVAL_STAMP: AtomicU64 = AtomicU64::new(0);

/// A committed content change, queued for the owner to drain
///
/// `cursor_before` is the cursor position where the change originated; it is
/// `None` for host-driven content syncs that carry no cursor information.
/// `stamp` orders changes across surfaces: two changes pending on different
/// surfaces compare in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChange {
    pub before: String,
    pub after: String,
    pub cursor_before: Option<CursorPosition>,
    pub stamp: u64,
}

/// Layout result of a programmatic restore
///
/// The owner uses this to re-lay-out the block's view for the new line count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreLayout {
    pub line_count: u32,
    pub content_height: u32,
}

/// The live editable view of one block's content
pub struct TextSurface {
    buffer: TextBuffer,
    cursor: CursorPosition,
    selection: Option<Selection>,
    line_height: u32,
    restoring: bool,
    changes: VecDeque<ContentChange>,
}

impl TextSurface {
    /// Creates a surface over the given content, cursor at the start
    pub fn new(content: &str) -> Self {
        Self {
            buffer: TextBuffer::from_content(content),
            cursor: CursorPosition::start(),
            selection: None,
            line_height: DEFAULT_LINE_HEIGHT,
            restoring: false,
            changes: VecDeque::new(),
        }
    }

    /// Overrides the line height used for the content-height model
    pub fn with_line_height(mut self, line_height: u32) -> Self {
        self.line_height = line_height;
        self
    }

    /// Current content
    pub fn content(&self) -> String {
        self.buffer.content()
    }

    /// Current line count
    pub fn line_count(&self) -> u32 {
        self.buffer.line_count()
    }

    /// Length of a line in characters, 0 if out of range
    pub fn line_length(&self, line: u32) -> u32 {
        self.buffer.line_length(line)
    }

    /// Height the block's view needs to show all content without scrolling
    pub fn content_height(&self) -> u32 {
        (self.buffer.line_count() + 1) * self.line_height
    }

    /// Current cursor position
    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    /// Moves the cursor, clamped into the buffer
    pub fn set_cursor(&mut self, position: CursorPosition) {
        self.cursor = position.clamped_to(&self.buffer);
    }

    /// Current selection, if any
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Sets the selection, clamped into the buffer
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = Some(selection.clamped_to(&self.buffer));
    }

    /// Clears the selection
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// True while a programmatic restore is applying
    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    /// Inserts a character at the cursor
    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_newline();
            return;
        }
        let before = self.buffer.content();
        let origin = self.cursor;
        if self.buffer.insert_char(origin.line, origin.column, ch) {
            self.cursor.column += 1;
            self.commit(before, origin);
        }
    }

    /// Splits the current line at the cursor
    pub fn insert_newline(&mut self) {
        let before = self.buffer.content();
        let origin = self.cursor;
        if self.buffer.split_line(origin.line, origin.column) {
            self.cursor = CursorPosition::new(origin.line + 1, 1);
            self.commit(before, origin);
        }
    }

    /// Inserts a string at the cursor as one committed change
    pub fn insert_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let before = self.buffer.content();
        let origin = self.cursor;
        for ch in text.chars() {
            if ch == '\n' {
                if self.buffer.split_line(self.cursor.line, self.cursor.column) {
                    self.cursor = CursorPosition::new(self.cursor.line + 1, 1);
                }
            } else if self.buffer.insert_char(self.cursor.line, self.cursor.column, ch) {
                self.cursor.column += 1;
            }
        }
        self.commit(before, origin);
    }

    /// Removes the character before the cursor
    pub fn backspace(&mut self) {
        let before = self.buffer.content();
        let origin = self.cursor;
        if let Some((line, column)) = self.buffer.remove_before(origin.line, origin.column) {
            self.cursor = CursorPosition::new(line, column);
            self.commit(before, origin);
        }
    }

    /// Removes the character at the cursor
    pub fn delete_forward(&mut self) {
        let before = self.buffer.content();
        let origin = self.cursor;
        if self.buffer.remove_at(origin.line, origin.column) {
            self.commit(before, origin);
        }
    }

    /// Replaces the whole content, as committed by the host view
    ///
    /// Used when the embedding editor reports a content sync rather than a
    /// keystroke; the cursor stays where it was, clamped to the new bounds.
    pub fn replace_content(&mut self, content: &str) {
        let before = self.buffer.content();
        if before == content {
            return;
        }
        let origin = self.cursor;
        self.buffer.set_content(content);
        self.cursor = self.cursor.clamped_to(&self.buffer);
        self.selection = self.selection.map(|s| s.clamped_to(&self.buffer));
        self.commit(before, origin);
    }

    /// Drains all committed changes in order
    pub fn take_changes(&mut self) -> Vec<ContentChange> {
        self.changes.drain(..).collect()
    }

    /// Applies a programmatic restore (undo/redo), without committing
    ///
    /// The restore never queues a content change, so history application
    /// cannot record itself. The cursor moves to `cursor` when given,
    /// otherwise the surface's last-known cursor and selection are kept;
    /// either way everything is clamped to the restored content, and an
    /// unusable position falls back to the end of the buffer.
    pub fn restore(&mut self, content: &str, cursor: Option<CursorPosition>) -> RestoreLayout {
        self.restoring = true;
        self.buffer.set_content(content);
        self.cursor = match cursor {
            Some(position) => position.clamped_to(&self.buffer),
            None => self.cursor.clamped_to(&self.buffer),
        };
        self.selection = self.selection.map(|s| s.clamped_to(&self.buffer));
        self.restoring = false;
        RestoreLayout {
            line_count: self.buffer.line_count(),
            content_height: self.content_height(),
        }
    }

    /// Places the cursor at the very end of the buffer
    ///
    /// The safe fallback when a finer-grained restore is impossible.
    pub fn cursor_to_end(&mut self) {
        let line = self.buffer.line_count();
        self.cursor = CursorPosition::new(line, self.buffer.line_length(line) + 1);
    }

    fn commit(&mut self, before: String, origin: CursorPosition) {
        if self.restoring {
            return;
        }
        let after = self.buffer.content();
        if before == after {
            return;
        }
        self.changes.push_back(ContentChange {
            before,
            after,
            cursor_before: Some(origin),
            stamp: ARRIVAL_STAMP.fetch_add(1, Ordering::Relaxed),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_commits_one_change_per_keystroke() {
        let mut surface = TextSurface::new("");
        surface.insert_char('a');
        surface.insert_char('b');
        let changes = surface.take_changes();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].before, "");
        assert_eq!(changes[0].after, "a");
        assert_eq!(changes[1].before, "a");
        assert_eq!(changes[1].after, "ab");
        assert_eq!(surface.cursor(), CursorPosition::new(1, 3));
    }

    #[test]
    fn test_insert_newline_moves_cursor() {
        let mut surface = TextSurface::new("hello");
        surface.set_cursor(CursorPosition::new(1, 3));
        surface.insert_newline();
        assert_eq!(surface.content(), "he\nllo");
        assert_eq!(surface.cursor(), CursorPosition::new(2, 1));
    }

    #[test]
    fn test_insert_str_is_one_change() {
        let mut surface = TextSurface::new("");
        surface.insert_str("x = 1\nprint(x)");
        let changes = surface.take_changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].after, "x = 1\nprint(x)");
        assert_eq!(surface.cursor(), CursorPosition::new(2, 9));
    }

    #[test]
    fn test_backspace_records_origin_cursor() {
        let mut surface = TextSurface::new("ab");
        surface.set_cursor(CursorPosition::new(1, 3));
        surface.backspace();
        let changes = surface.take_changes();
        assert_eq!(changes[0].cursor_before, Some(CursorPosition::new(1, 3)));
        assert_eq!(surface.content(), "a");
        assert_eq!(surface.cursor(), CursorPosition::new(1, 2));
    }

    #[test]
    fn test_stamps_interleave_across_surfaces() {
        let mut a = TextSurface::new("");
        let mut b = TextSurface::new("");
        a.insert_char('1');
        b.insert_char('2');
        a.insert_char('3');
        let a_changes = a.take_changes();
        let b_changes = b.take_changes();
        assert!(a_changes[0].stamp < b_changes[0].stamp);
        assert!(b_changes[0].stamp < a_changes[1].stamp);
    }

    #[test]
    fn test_replace_content_same_text_is_silent() {
        let mut surface = TextSurface::new("same");
        surface.replace_content("same");
        assert!(surface.take_changes().is_empty());
    }

    #[test]
    fn test_replace_content_clamps_cursor() {
        let mut surface = TextSurface::new("long line here");
        surface.set_cursor(CursorPosition::new(1, 15));
        surface.replace_content("ab");
        assert_eq!(surface.cursor(), CursorPosition::new(1, 3));
        assert_eq!(surface.take_changes().len(), 1);
    }

    #[test]
    fn test_restore_does_not_commit() {
        let mut surface = TextSurface::new("before");
        let layout = surface.restore("after\nmore", Some(CursorPosition::new(1, 4)));
        assert!(surface.take_changes().is_empty());
        assert_eq!(surface.content(), "after\nmore");
        assert_eq!(surface.cursor(), CursorPosition::new(1, 4));
        assert_eq!(layout.line_count, 2);
        assert_eq!(layout.content_height, 3 * DEFAULT_LINE_HEIGHT);
    }

    #[test]
    fn test_restore_clamps_stored_cursor() {
        let mut surface = TextSurface::new("line one\nline two");
        surface.restore("ab", Some(CursorPosition::new(2, 7)));
        assert_eq!(surface.cursor(), CursorPosition::new(1, 3));
    }

    #[test]
    fn test_restore_without_cursor_keeps_last_known() {
        let mut surface = TextSurface::new("abcdef");
        surface.set_cursor(CursorPosition::new(1, 4));
        surface.restore("abcdef\nmore", None);
        assert_eq!(surface.cursor(), CursorPosition::new(1, 4));
    }

    #[test]
    fn test_content_height_tracks_line_count() {
        let surface = TextSurface::new("a\nb\nc");
        assert_eq!(surface.content_height(), 4 * DEFAULT_LINE_HEIGHT);
        let custom = TextSurface::new("a").with_line_height(21);
        assert_eq!(custom.content_height(), 42);
    }

    #[test]
    fn test_cursor_to_end() {
        let mut surface = TextSurface::new("ab\ncde");
        surface.cursor_to_end();
        assert_eq!(surface.cursor(), CursorPosition::new(2, 4));
    }
}
