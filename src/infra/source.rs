//! Source text access
//!
//! The indexer and reference finder never open files directly; they ask a
//! [`SourceProvider`] so an editor can serve unsaved buffers.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// "Get full text content of file X"
pub trait SourceProvider: Send + Sync {
    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Reads straight from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl SourceProvider for FsSource {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// In-memory buffers keyed by path, used for open editor tabs and tests
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<PathBuf, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }
}

impl SourceProvider for MemorySource {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no buffer for {}", path.display()),
            )
        })
    }
}
