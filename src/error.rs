//! Error types for Codenav

use std::path::PathBuf;

use thiserror::Error;

use crate::models::symbol::Language;

/// Failures while turning one file into symbols.
///
/// These never escape `FileIndexer::index_file`; they are logged and the
/// file yields no symbols.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Syntax error in {path} at line {line}")]
    Syntax { path: PathBuf, line: u32 },

    #[error("Parser setup failed for {language:?}: {message}")]
    Parser { language: Language, message: String },

    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No parser available for {0:?}")]
    UnsupportedLanguage(Language),
}

impl IndexError {
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Incompatible cache version: {found:?} (expected {expected})")]
    IncompatibleVersion {
        found: Option<String>,
        expected: &'static str,
    },

    #[error("Cache is not configured")]
    NoCachePath,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project already initialized at: {0}")]
    AlreadyExists(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
