//! Per-file symbol extraction

use std::path::Path;
use std::sync::Arc;

use crate::error::IndexError;
use crate::infra::ast::{outline, python};
use crate::infra::source::{FsSource, SourceProvider};
use crate::models::symbol::{Language, ParseStrategy, SymbolRecord};

/// Turns one file into a line-ordered list of symbols.
///
/// Failures never reach the caller: a file that cannot be read or parsed is
/// logged and yields an empty list. An empty result therefore means "no
/// symbols, possibly because parsing failed".
pub struct FileIndexer {
    source: Arc<dyn SourceProvider>,
}

impl Default for FileIndexer {
    fn default() -> Self {
        Self::new(Arc::new(FsSource))
    }
}

impl FileIndexer {
    pub fn new(source: Arc<dyn SourceProvider>) -> Self {
        Self { source }
    }

    pub fn index_file(&self, path: &Path) -> Vec<SymbolRecord> {
        let content = match self.source.read(path) {
            Ok(content) => content,
            Err(source) => {
                let err = IndexError::Read {
                    path: path.to_path_buf(),
                    source,
                };
                tracing::warn!("{}", err);
                return Vec::new();
            }
        };

        self.index_source(path, &content)
    }

    /// Index text already in memory
    pub fn index_source(&self, path: &Path, content: &str) -> Vec<SymbolRecord> {
        match Self::extract(path, content) {
            Ok(symbols) => {
                tracing::debug!("Indexed {} symbols from {}", symbols.len(), path.display());
                symbols
            }
            Err(e) if e.is_syntax() => {
                tracing::warn!("{}", e);
                Vec::new()
            }
            Err(IndexError::UnsupportedLanguage(_)) => {
                tracing::debug!("No grammar for {}", path.display());
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Failed to index {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    fn extract(path: &Path, content: &str) -> Result<Vec<SymbolRecord>, IndexError> {
        match ParseStrategy::for_path(path) {
            ParseStrategy::Structured => python::extract(path, content),
            ParseStrategy::Outline => outline::extract(path, content, Language::from_path(path)),
        }
    }
}
