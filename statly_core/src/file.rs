//! Files opened in the workspace.

use crate::buffer::TextBuffer;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A file open in the workspace.
///
/// The byte length is the stored length of the file: it changes when the
/// file is saved, not while its document is edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    name: String,
    path: Option<PathBuf>,
    len: u64,
}

impl FileHandle {
    /// Reads a file from disk.
    ///
    /// Returns the handle and, for text files, the decoded contents.
    /// Files containing NUL bytes or invalid UTF-8 are treated as binary
    /// and have no text.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<(Self, Option<TextBuffer>)> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let handle = Self {
            name: display_name(path),
            path: Some(path.to_path_buf()),
            len: bytes.len() as u64,
        };

        let text = if bytes.contains(&0) {
            None
        } else {
            std::str::from_utf8(&bytes).ok().map(TextBuffer::from_str)
        };
        if text.is_none() {
            log::debug!("Opened {} as binary ({} bytes)", path.display(), handle.len);
        }

        Ok((handle, text))
    }

    /// Creates a handle for an in-memory file that was never saved.
    pub fn untitled(name: impl Into<String>, len: u64) -> Self {
        Self {
            name: name.into(),
            path: None,
            len,
        }
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the file path, if the file exists on disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the raw byte length.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns true if the file is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Re-reads the byte length from disk.
    pub fn refresh(&mut self) -> io::Result<()> {
        if let Some(path) = &self.path {
            self.len = fs::metadata(path)?.len();
        }
        Ok(())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| path.display().to_string())
}
