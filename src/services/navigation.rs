//! Cursor-driven navigation on top of the index
//!
//! The editor is an external collaborator reached through [`EditorHost`];
//! rendering, selection and tab handling stay on its side.

use std::path::Path;
use std::sync::Arc;

use crate::infra::source::SourceProvider;
use crate::models::symbol::{Location, Reference, SymbolRecord};
use crate::services::index::SymbolIndex;
use crate::services::references::ReferenceFinder;
use crate::services::resolver::DefinitionResolver;

/// What the core needs from the surrounding editor
pub trait EditorHost {
    /// Full text of a file, including unsaved edits
    fn file_content(&self, path: &Path) -> Option<String>;

    /// Current cursor: file, 1-based line, 0-based column
    fn cursor(&self) -> Option<Location>;

    /// Open the file if needed, move the cursor and make it visible
    fn reveal(&mut self, location: &Location);
}

/// Result of a jump request
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    Revealed(Arc<SymbolRecord>),
    NoSymbolAtCursor,
    NotFound(String),
}

pub struct NavigationService<'a> {
    index: &'a SymbolIndex,
}

impl<'a> NavigationService<'a> {
    pub fn new(index: &'a SymbolIndex) -> Self {
        Self { index }
    }

    /// Identifier (alphanumeric or `_` run) touching the given position
    pub fn symbol_at_position(content: &str, line: u32, column: u32) -> Option<String> {
        if line == 0 {
            return None;
        }
        let text: Vec<char> = content.split('\n').nth(line as usize - 1)?.chars().collect();
        let column = column as usize;
        if column > text.len() {
            return None;
        }

        let is_word = |c: char| c.is_alphanumeric() || c == '_';

        let mut start = column;
        while start > 0 && is_word(text[start - 1]) {
            start -= 1;
        }
        let mut end = column;
        while end < text.len() && is_word(text[end]) {
            end += 1;
        }

        (start < end).then(|| text[start..end].iter().collect())
    }

    /// Symbol under the host's cursor together with the cursor position
    pub fn symbol_at_cursor(&self, host: &dyn EditorHost) -> Option<(String, Location)> {
        let cursor = host.cursor()?;
        let content = host.file_content(&cursor.file)?;
        let name = Self::symbol_at_position(&content, cursor.line, cursor.column)?;
        Some((name, cursor))
    }

    /// Resolve the symbol under the cursor and reveal its definition
    pub fn jump_to_definition(&self, host: &mut dyn EditorHost) -> NavigationOutcome {
        let Some((name, cursor)) = self.symbol_at_cursor(host) else {
            return NavigationOutcome::NoSymbolAtCursor;
        };

        match DefinitionResolver::new(self.index).find_definition(&name, &cursor.file) {
            Some(record) => {
                tracing::debug!("Jumping to {}", record);
                self.jump_to_symbol(host, &record);
                NavigationOutcome::Revealed(record)
            }
            None => {
                tracing::debug!("No definition for {}", name);
                NavigationOutcome::NotFound(name)
            }
        }
    }

    pub fn jump_to_symbol(&self, host: &mut dyn EditorHost, record: &SymbolRecord) {
        host.reveal(&record.location);
    }

    /// Whole-word references to the symbol under the cursor
    pub fn references_at_cursor(
        &self,
        host: &dyn EditorHost,
        source: &dyn SourceProvider,
    ) -> Option<(String, Vec<Reference>)> {
        let (name, _) = self.symbol_at_cursor(host)?;
        let references = ReferenceFinder::new(self.index, source).find_all_references(&name, None);
        Some((name, references))
    }
}
