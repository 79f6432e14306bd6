//! Command implementations for Codenav
//!
//! Each command is implemented in its own module.

pub mod config;
pub mod find;
pub mod index;
pub mod init;
pub mod search;
pub mod status;
