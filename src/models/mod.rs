//! Data models for Codenav
//!
//! Contains core type definitions used throughout the application.

pub mod config;
pub mod symbol;

// Re-export commonly used types
pub use config::CodenavConfig;
pub use symbol::{Language, Location, ParseStrategy, Reference, SymbolKind, SymbolRecord};
