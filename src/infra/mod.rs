//! Infrastructure layer for Codenav
//!
//! Parsing, scoring, file discovery and source access.

pub mod ast;
pub mod file_filter;
pub mod fuzzy;
pub mod source;

pub use file_filter::{FileFilter, FileFilterConfig};
pub use source::{FsSource, MemorySource, SourceProvider};
