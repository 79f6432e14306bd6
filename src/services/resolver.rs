//! Definition lookup with locality-first disambiguation

use std::path::Path;
use std::sync::Arc;

use crate::models::symbol::{SymbolKind, SymbolRecord};
use crate::services::index::SymbolIndex;

pub struct DefinitionResolver<'a> {
    index: &'a SymbolIndex,
}

impl<'a> DefinitionResolver<'a> {
    pub fn new(index: &'a SymbolIndex) -> Self {
        Self { index }
    }

    /// Best definition of `name` as seen from `context_file`, `None` when the
    /// name is not indexed
    pub fn find_definition(&self, name: &str, context_file: &Path) -> Option<Arc<SymbolRecord>> {
        match self.index.find_symbol(name) {
            [] => None,
            [only] => Some(Arc::clone(only)),
            candidates => resolve_ambiguous(candidates, context_file).map(Arc::clone),
        }
    }
}

/// First matching rule wins:
/// 1. same file, a class if there is one
/// 2. same directory
/// 3. any class
/// 4. first candidate
///
/// `None` only for an empty slice.
pub fn resolve_ambiguous<'c>(
    candidates: &'c [Arc<SymbolRecord>],
    context_file: &Path,
) -> Option<&'c Arc<SymbolRecord>> {
    let is_class = |r: &&Arc<SymbolRecord>| r.kind == SymbolKind::Class;

    let same_file: Vec<&Arc<SymbolRecord>> = candidates
        .iter()
        .filter(|r| r.file() == context_file)
        .collect();
    if let Some(first) = same_file.first() {
        return same_file.iter().copied().find(is_class).or(Some(*first));
    }

    let context_dir = context_file.parent();
    if let Some(record) = candidates.iter().find(|r| r.file().parent() == context_dir) {
        return Some(record);
    }

    candidates.iter().find(is_class).or(candidates.first())
}
