//! Editable documents.

use crate::buffer::TextBuffer;
use crate::events::{EditorEvent, EventPublisher};
use crate::workspace::BufferId;
use std::io;
use std::path::Path;

/// The editable text of an open file.
///
/// Every effective edit publishes [`EditorEvent::DocumentChanged`].
#[derive(Debug)]
pub struct Document {
    id: BufferId,
    buffer: TextBuffer,
    modified: bool,
    events: EventPublisher,
}

impl Document {
    pub(crate) fn new(id: BufferId, buffer: TextBuffer, events: EventPublisher) -> Self {
        Self {
            id,
            buffer,
            modified: false,
            events,
        }
    }

    /// Returns the buffer this document belongs to.
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Returns the number of characters.
    pub fn char_len(&self) -> usize {
        self.buffer.len_chars()
    }

    /// Returns the number of lines.
    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    /// Returns the whole text.
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Returns whether the document has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Inserts text at a character index.
    pub fn insert(&mut self, char_idx: usize, text: &str) {
        if self.buffer.insert(char_idx, text) {
            self.changed();
        }
    }

    /// Removes the characters in `start..end`.
    pub fn remove(&mut self, start: usize, end: usize) {
        if self.buffer.remove(start, end) {
            self.changed();
        }
    }

    /// Writes the document to disk and clears the modified flag.
    pub fn save_to(&mut self, path: &Path) -> io::Result<()> {
        self.buffer.save_to_file(path)?;
        self.modified = false;
        Ok(())
    }

    fn changed(&mut self) {
        self.modified = true;
        self.events
            .publish(EditorEvent::DocumentChanged { buffer: self.id });
    }
}
