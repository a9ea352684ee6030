//! Workspace management for open files and tabs.

use crate::buffer::TextBuffer;
use crate::document::Document;
use crate::events::{EditorEvent, EventPublisher};
use crate::file::FileHandle;
use std::io;
use std::path::{Path, PathBuf};

/// Unique identifier for an open buffer.
pub type BufferId = usize;

/// Information about a buffer tab.
#[derive(Debug, Clone)]
pub struct TabInfo {
    /// Buffer ID.
    pub id: BufferId,
    /// Display name (file name or the untitled name).
    pub name: String,
    /// Full file path, if any.
    pub path: Option<PathBuf>,
    /// Whether the file has editable text.
    pub is_text: bool,
    /// Whether the document has unsaved changes.
    pub is_modified: bool,
}

/// An open file and its document, if it has one.
#[derive(Debug)]
struct OpenFile {
    file: FileHandle,
    document: Option<Document>,
}

/// Manages the open files of a session.
///
/// Every change of the active buffer publishes one
/// [`EditorEvent::SelectionChanged`].
#[derive(Debug)]
pub struct Workspace {
    /// All open files, indexed by BufferId.
    buffers: Vec<Option<OpenFile>>,
    /// Currently active buffer ID.
    active_buffer: Option<BufferId>,
    /// Order of tabs (buffer IDs in display order).
    tab_order: Vec<BufferId>,
    /// Next buffer ID to assign.
    next_id: BufferId,
    events: EventPublisher,
}

impl Workspace {
    /// Creates an empty workspace publishing on the given bus.
    pub fn new(events: EventPublisher) -> Self {
        Self {
            buffers: Vec::new(),
            active_buffer: None,
            tab_order: Vec::new(),
            next_id: 0,
            events,
        }
    }

    /// Opens a file from disk in a new tab and activates it.
    ///
    /// A path that is already open is re-activated instead.
    pub fn open_file<P: AsRef<Path>>(&mut self, path: P) -> io::Result<BufferId> {
        let path = path.as_ref();

        if let Some(existing_id) = self.find_buffer_by_path(path) {
            self.activate(Some(existing_id));
            return Ok(existing_id);
        }

        let (file, text) = FileHandle::open(path)?;
        log::info!("Opened {} ({} bytes)", path.display(), file.len());
        Ok(self.insert(file, text))
    }

    /// Opens an untitled in-memory text file and activates it.
    pub fn open_text(&mut self, name: impl Into<String>, text: &str) -> BufferId {
        let buffer = TextBuffer::from_str(text);
        let file = FileHandle::untitled(name, buffer.len_bytes() as u64);
        self.insert(file, Some(buffer))
    }

    fn insert(&mut self, file: FileHandle, text: Option<TextBuffer>) -> BufferId {
        let id = self.next_id;
        self.next_id += 1;

        let document = text.map(|buffer| Document::new(id, buffer, self.events.clone()));

        // Ensure buffers vec is large enough
        if id >= self.buffers.len() {
            self.buffers.resize_with(id + 1, || None);
        }
        self.buffers[id] = Some(OpenFile { file, document });
        self.tab_order.push(id);
        self.activate(Some(id));

        id
    }

    /// Finds a buffer by file path.
    fn find_buffer_by_path(&self, path: &Path) -> Option<BufferId> {
        self.tab_order.iter().copied().find(|&id| {
            self.entry(id)
                .map(|open| open.file.path() == Some(path))
                .unwrap_or(false)
        })
    }

    fn entry(&self, id: BufferId) -> Option<&OpenFile> {
        self.buffers.get(id).and_then(|opt| opt.as_ref())
    }

    fn entry_mut(&mut self, id: BufferId) -> Option<&mut OpenFile> {
        self.buffers.get_mut(id).and_then(|opt| opt.as_mut())
    }

    fn activate(&mut self, new: Option<BufferId>) {
        let old = self.active_buffer;
        if old == new {
            return;
        }
        self.active_buffer = new;
        log::debug!("Selection changed: {:?} -> {:?}", old, new);
        self.events.publish(EditorEvent::SelectionChanged { old, new });
    }

    /// Returns the currently active buffer ID.
    pub fn active_buffer_id(&self) -> Option<BufferId> {
        self.active_buffer
    }

    /// Returns the active file.
    pub fn active_file(&self) -> Option<&FileHandle> {
        self.active_buffer
            .and_then(|id| self.entry(id))
            .map(|open| &open.file)
    }

    /// Returns the document of the active file.
    ///
    /// Binary files are active without a document.
    pub fn active_document(&self) -> Option<&Document> {
        self.active_buffer.and_then(|id| self.document(id))
    }

    /// Returns a mutable reference to the active document.
    pub fn active_document_mut(&mut self) -> Option<&mut Document> {
        let id = self.active_buffer?;
        self.document_mut(id)
    }

    /// Returns the document of a specific buffer.
    pub fn document(&self, id: BufferId) -> Option<&Document> {
        self.entry(id).and_then(|open| open.document.as_ref())
    }

    /// Returns a mutable reference to the document of a specific buffer.
    pub fn document_mut(&mut self, id: BufferId) -> Option<&mut Document> {
        self.entry_mut(id).and_then(|open| open.document.as_mut())
    }

    /// Sets the active buffer.
    pub fn set_active_buffer(&mut self, id: BufferId) -> bool {
        if self.entry(id).is_some() {
            self.activate(Some(id));
            true
        } else {
            false
        }
    }

    /// Switches to the next tab.
    pub fn next_tab(&mut self) {
        if self.tab_order.len() <= 1 {
            return;
        }
        if let Some(pos) = self.active_tab_index() {
            let next_pos = (pos + 1) % self.tab_order.len();
            self.activate(Some(self.tab_order[next_pos]));
        }
    }

    /// Switches to the previous tab.
    pub fn prev_tab(&mut self) {
        if self.tab_order.len() <= 1 {
            return;
        }
        if let Some(pos) = self.active_tab_index() {
            let prev_pos = if pos == 0 {
                self.tab_order.len() - 1
            } else {
                pos - 1
            };
            self.activate(Some(self.tab_order[prev_pos]));
        }
    }

    /// Switches to a specific tab by index (0-based).
    pub fn switch_to_tab(&mut self, index: usize) {
        if let Some(&id) = self.tab_order.get(index) {
            self.activate(Some(id));
        }
    }

    /// Returns information about all tabs.
    pub fn tabs(&self) -> Vec<TabInfo> {
        self.tab_order
            .iter()
            .filter_map(|&id| {
                self.entry(id).map(|open| TabInfo {
                    id,
                    name: open.file.name().to_string(),
                    path: open.file.path().map(|p| p.to_path_buf()),
                    is_text: open.document.is_some(),
                    is_modified: open
                        .document
                        .as_ref()
                        .map(|d| d.is_modified())
                        .unwrap_or(false),
                })
            })
            .collect()
    }

    /// Returns the number of open tabs.
    pub fn tab_count(&self) -> usize {
        self.tab_order.len()
    }

    /// Returns the index of the active tab.
    pub fn active_tab_index(&self) -> Option<usize> {
        self.active_buffer
            .and_then(|id| self.tab_order.iter().position(|&tab_id| tab_id == id))
    }

    /// Closes a buffer by ID. Returns true if buffer was closed.
    /// Does not check for unsaved changes - caller should handle that.
    pub fn close_buffer(&mut self, id: BufferId) -> bool {
        let Some(slot) = self.buffers.get_mut(id) else {
            return false;
        };
        if slot.take().is_none() {
            return false;
        }

        if let Some(pos) = self.tab_order.iter().position(|&tab_id| tab_id == id) {
            self.tab_order.remove(pos);
        }

        if self.active_buffer == Some(id) {
            let next = self.tab_order.first().copied();
            self.activate(next);
        }
        true
    }

    /// Closes the active buffer. Returns the closed buffer ID if successful.
    pub fn close_active_buffer(&mut self) -> Option<BufferId> {
        let id = self.active_buffer?;
        self.close_buffer(id).then_some(id)
    }

    /// Saves the active document to its file and refreshes the file length.
    pub fn save_active(&mut self) -> io::Result<()> {
        let open = self
            .active_buffer
            .and_then(|id| self.buffers.get_mut(id))
            .and_then(|opt| opt.as_mut())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No active buffer"))?;
        let path = open
            .file
            .path()
            .map(|p| p.to_path_buf())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No file path set"))?;
        let document = open
            .document
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No text to save"))?;

        document.save_to(&path)?;
        open.file.refresh()?;
        log::info!("Saved {} ({} bytes)", path.display(), open.file.len());
        Ok(())
    }
}
