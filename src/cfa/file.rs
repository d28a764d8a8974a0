//! File access backends for configuration models.
//!
//! Models only ever read and write whole files through a [`FileHandler`],
//! so the same model code runs against the real filesystem or an
//! in-memory buffer.

use anyhow::Result;
use std::path::Path;
use std::sync::Mutex;

use crate::common::{read_text, write_file_with_dirs};

/// Whole-file read/write backend.
pub trait FileHandler: Send + Sync {
    /// Read the complete file content.
    fn read(&self, path: &Path) -> Result<String>;
    /// Replace the complete file content.
    fn write(&self, path: &Path, content: &str) -> Result<()>;
}

/// Filesystem-backed handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFile;

impl FileHandler for DiskFile {
    fn read(&self, path: &Path) -> Result<String> {
        read_text(path)
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        write_file_with_dirs(path, content)
    }
}

/// In-memory handler holding a single file's content.
///
/// The path argument is ignored; one `MemoryFile` stands in for one file.
#[derive(Debug, Default)]
pub struct MemoryFile {
    content: Mutex<String>,
}

impl MemoryFile {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Mutex::new(content.into()),
        }
    }

    /// Current content, i.e. the initial text or the last write.
    pub fn content(&self) -> String {
        match self.content.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl FileHandler for MemoryFile {
    fn read(&self, _path: &Path) -> Result<String> {
        Ok(self.content())
    }

    fn write(&self, _path: &Path, content: &str) -> Result<()> {
        let mut guard = match self.content.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = content.to_string();
        Ok(())
    }
}
