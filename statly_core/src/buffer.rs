//! Text buffer implementation using ropey.

use ropey::Rope;
use std::fs;
use std::io::{self, BufWriter};
use std::path::Path;

/// A rope-backed text buffer holding the contents of one document.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// Creates a new empty text buffer.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Creates a text buffer from a string.
    pub fn from_str(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Writes the buffer to a file, replacing its contents.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.rope.write_to(&mut writer)?;
        Ok(())
    }

    /// Returns the total number of characters (Unicode scalar values).
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the total number of lines.
    ///
    /// An empty buffer has one line, and a trailing newline starts another.
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Returns the UTF-8 encoded length in bytes.
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Inserts a string at the given character index.
    /// Returns false when there was nothing to insert.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let idx = char_idx.min(self.len_chars());
        self.rope.insert(idx, text);
        true
    }

    /// Removes text in the given character range.
    /// Returns false when the clamped range was empty.
    pub fn remove(&mut self, start: usize, end: usize) -> bool {
        let start = start.min(self.len_chars());
        let end = end.min(self.len_chars());
        if start < end {
            self.rope.remove(start..end);
            true
        } else {
            false
        }
    }

    /// Returns the entire buffer as a string.
    pub fn to_string(&self) -> String {
        self.rope.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer() {
        let buf = TextBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len_chars(), 0);
        assert_eq!(buf.len_lines(), 1); // Empty buffer has 1 line
    }

    #[test]
    fn test_from_str_counts() {
        let buf = TextBuffer::from_str("hello\nworld");
        assert_eq!(buf.len_chars(), 11);
        assert_eq!(buf.len_lines(), 2);
        assert_eq!(buf.len_bytes(), 11);
    }

    #[test]
    fn test_trailing_newline_opens_line() {
        let buf = TextBuffer::from_str("a\nb\n");
        assert_eq!(buf.len_lines(), 3);
    }

    #[test]
    fn test_multibyte_chars() {
        let buf = TextBuffer::from_str("héllo ✓");
        assert_eq!(buf.len_chars(), 7);
        assert_eq!(buf.len_bytes(), 10);
    }

    #[test]
    fn test_insert() {
        let mut buf = TextBuffer::new();
        assert!(buf.insert(0, "hello"));
        assert!(buf.insert(99, " world")); // Clamped to end
        assert!(!buf.insert(0, ""));
        assert_eq!(buf.to_string(), "hello world");
    }

    #[test]
    fn test_remove() {
        let mut buf = TextBuffer::from_str("hello world");
        assert!(buf.remove(5, 11));
        assert_eq!(buf.to_string(), "hello");
        assert!(!buf.remove(3, 3));
        assert!(!buf.remove(4, 2));
    }
}
