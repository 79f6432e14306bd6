//! Codenav - Symbol Index and Navigation Library
//!
//! Extracts symbols from source files (deep parsing for Python, outline
//! parsing for other tree-sitter languages), keeps them in a queryable
//! index with fuzzy search and a JSON cache, and resolves definitions and
//! references by name.

pub mod app;
pub mod cli;
pub mod error;
pub mod infra;
pub mod models;
pub mod services;
