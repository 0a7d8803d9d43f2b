//! Line-based text storage
//!
//! Addressing is 1-based throughout, matching cursor coordinates: `line` in
//! `[1, line_count]`, `column` in `[1, line_length + 1]` for insertion
//! points. Out-of-range edits return `false` and leave the buffer untouched.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

/// Text buffer holding a block's content as lines
///
/// Always holds at least one (possibly empty) line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
}

impl TextBuffer {
    /// Creates an empty buffer with a single empty line
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    /// Creates a buffer from block content
    pub fn from_content(content: &str) -> Self {
        let mut buffer = Self::new();
        buffer.set_content(content);
        buffer
    }

    /// Replaces the entire content
    pub fn set_content(&mut self, content: &str) {
        if content.is_empty() {
            self.lines = vec![String::new()];
        } else {
            self.lines = content.split('\n').map(String::from).collect();
        }
    }

    /// Joins the lines back into block content
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// Number of lines, always at least 1
    pub fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    /// Returns the text of a line, if it exists
    pub fn line(&self, line: u32) -> Option<&str> {
        self.index(line).map(|i| self.lines[i].as_str())
    }

    /// Length of a line in characters, 0 if the line does not exist
    pub fn line_length(&self, line: u32) -> u32 {
        self.index(line)
            .map(|i| self.lines[i].chars().count() as u32)
            .unwrap_or(0)
    }

    /// True if the buffer holds no text at all
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Inserts a character before `column` on `line`
    pub fn insert_char(&mut self, line: u32, column: u32, ch: char) -> bool {
        let Some(i) = self.index(line) else {
            return false;
        };
        let Some(byte) = char_boundary(&self.lines[i], column) else {
            return false;
        };
        self.lines[i].insert(byte, ch);
        true
    }

    /// Splits `line` at `column`, moving the tail onto a new next line
    pub fn split_line(&mut self, line: u32, column: u32) -> bool {
        let Some(i) = self.index(line) else {
            return false;
        };
        let Some(byte) = char_boundary(&self.lines[i], column) else {
            return false;
        };
        let tail = self.lines[i].split_off(byte);
        self.lines.insert(i + 1, tail);
        true
    }

    /// Removes the character before `column` on `line` (backspace)
    ///
    /// At column 1 the line is joined onto the previous one. Returns the new
    /// cursor position, or `None` at the very start of the buffer.
    pub fn remove_before(&mut self, line: u32, column: u32) -> Option<(u32, u32)> {
        let i = self.index(line)?;
        if column > 1 {
            let byte = char_boundary(&self.lines[i], column - 1)?;
            self.lines[i].remove(byte);
            Some((line, column - 1))
        } else if i > 0 {
            let current = self.lines.remove(i);
            let new_column = self.lines[i - 1].chars().count() as u32 + 1;
            self.lines[i - 1].push_str(&current);
            Some((line - 1, new_column))
        } else {
            None
        }
    }

    /// Removes the character at `column` on `line` (forward delete)
    ///
    /// At end of line the next line is joined up. Returns false at the very
    /// end of the buffer.
    pub fn remove_at(&mut self, line: u32, column: u32) -> bool {
        let Some(i) = self.index(line) else {
            return false;
        };
        let len = self.lines[i].chars().count() as u32;
        if column <= len {
            if let Some(byte) = char_boundary(&self.lines[i], column) {
                self.lines[i].remove(byte);
                return true;
            }
            false
        } else if i + 1 < self.lines.len() {
            let next = self.lines.remove(i + 1);
            self.lines[i].push_str(&next);
            true
        } else {
            false
        }
    }

    fn index(&self, line: u32) -> Option<usize> {
        if line >= 1 && (line as usize) <= self.lines.len() {
            Some(line as usize - 1)
        } else {
            None
        }
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte offset of 1-based character `column` in `line`
///
/// Valid columns run from 1 to the character count plus one (insertion after
/// the last character).
fn char_boundary(line: &str, column: u32) -> Option<usize> {
    if column == 0 {
        return None;
    }
    let mut remaining = column - 1;
    for (byte, _) in line.char_indices() {
        if remaining == 0 {
            return Some(byte);
        }
        remaining -= 1;
    }
    if remaining == 0 {
        Some(line.len())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_has_one_empty_line() {
        let buffer = TextBuffer::new();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line(1), Some(""));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_from_content() {
        let buffer = TextBuffer::from_content("hello\nworld");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line(1), Some("hello"));
        assert_eq!(buffer.line(2), Some("world"));
        assert_eq!(buffer.content(), "hello\nworld");
    }

    #[test]
    fn test_trailing_newline_keeps_empty_line() {
        let buffer = TextBuffer::from_content("a\n");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line(2), Some(""));
        assert_eq!(buffer.content(), "a\n");
    }

    #[test]
    fn test_insert_char() {
        let mut buffer = TextBuffer::from_content("hello");
        assert!(buffer.insert_char(1, 6, '!'));
        assert_eq!(buffer.line(1), Some("hello!"));
    }

    #[test]
    fn test_insert_char_out_of_range() {
        let mut buffer = TextBuffer::from_content("hi");
        assert!(!buffer.insert_char(2, 1, 'x'));
        assert!(!buffer.insert_char(1, 9, 'x'));
        assert_eq!(buffer.content(), "hi");
    }

    #[test]
    fn test_split_line() {
        let mut buffer = TextBuffer::from_content("hello");
        assert!(buffer.split_line(1, 3));
        assert_eq!(buffer.line(1), Some("he"));
        assert_eq!(buffer.line(2), Some("llo"));
    }

    #[test]
    fn test_remove_before() {
        let mut buffer = TextBuffer::from_content("hello");
        assert_eq!(buffer.remove_before(1, 6), Some((1, 5)));
        assert_eq!(buffer.line(1), Some("hell"));
    }

    #[test]
    fn test_remove_before_joins_lines() {
        let mut buffer = TextBuffer::from_content("hello\nworld");
        assert_eq!(buffer.remove_before(2, 1), Some((1, 6)));
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line(1), Some("helloworld"));
    }

    #[test]
    fn test_remove_before_at_buffer_start() {
        let mut buffer = TextBuffer::from_content("hello");
        assert_eq!(buffer.remove_before(1, 1), None);
        assert_eq!(buffer.content(), "hello");
    }

    #[test]
    fn test_remove_at_joins_next_line() {
        let mut buffer = TextBuffer::from_content("ab\ncd");
        assert!(buffer.remove_at(1, 3));
        assert_eq!(buffer.content(), "abcd");
    }

    #[test]
    fn test_remove_at_buffer_end() {
        let mut buffer = TextBuffer::from_content("ab");
        assert!(!buffer.remove_at(1, 3));
    }

    #[test]
    fn test_multibyte_characters() {
        let mut buffer = TextBuffer::from_content("héllo");
        assert_eq!(buffer.line_length(1), 5);
        assert!(buffer.insert_char(1, 3, 'x'));
        assert_eq!(buffer.line(1), Some("héxllo"));
        assert_eq!(buffer.remove_before(1, 3), Some((1, 2)));
        assert_eq!(buffer.line(1), Some("hxllo"));
    }
}
