//! Whole-word textual reference search

use std::path::{Path, PathBuf};

use crate::infra::source::SourceProvider;
use crate::models::symbol::Reference;
use crate::services::index::SymbolIndex;

/// Scans indexed files for occurrences of a name that are not part of a
/// larger identifier
pub struct ReferenceFinder<'a> {
    index: &'a SymbolIndex,
    source: &'a dyn SourceProvider,
}

impl<'a> ReferenceFinder<'a> {
    pub fn new(index: &'a SymbolIndex, source: &'a dyn SourceProvider) -> Self {
        Self { index, source }
    }

    /// Every whole-word occurrence of `name`.
    ///
    /// `files` restricts the scan; `None` or an empty slice searches every
    /// indexed file.
    pub fn find_all_references(&self, name: &str, files: Option<&[PathBuf]>) -> Vec<Reference> {
        if !is_searchable(name) {
            return Vec::new();
        }

        let mut references = Vec::new();
        for path in self.files_to_search(files) {
            let Some(content) = self.read(&path) else {
                continue;
            };

            for (line_index, line) in content.lines().enumerate() {
                for byte_col in whole_word_matches(line, name) {
                    references.push(Reference {
                        file: path.clone(),
                        line: line_index as u32 + 1,
                        column: line[..byte_col].chars().count() as u32,
                        context: line.trim().to_string(),
                    });
                }
            }
        }

        tracing::debug!("Found {} references to {}", references.len(), name);
        references
    }

    /// Same result as `find_all_references(name, None).len()` without building
    /// the references
    pub fn count_references(&self, name: &str) -> usize {
        if !is_searchable(name) {
            return 0;
        }

        self.files_to_search(None)
            .iter()
            .filter_map(|path| self.read(path))
            .map(|content| whole_word_matches(&content, name).count())
            .sum()
    }

    fn files_to_search(&self, files: Option<&[PathBuf]>) -> Vec<PathBuf> {
        match files {
            Some(files) if !files.is_empty() => files.to_vec(),
            _ => self.index.files().map(Path::to_path_buf).collect(),
        }
    }

    fn read(&self, path: &Path) -> Option<String> {
        match self.source.read(path) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::warn!("Skipping {} in reference search: {}", path.display(), e);
                None
            }
        }
    }
}

/// Names spanning lines could never match per line
fn is_searchable(name: &str) -> bool {
    !name.is_empty() && !name.contains(['\n', '\r'])
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte offsets of whole-word occurrences; the search resumes after each
/// candidate whether or not it was accepted.
///
/// Overlapping candidates are never considered, so a name bounded by
/// punctuation can hide a later hit: `-a-` in `-a-a-` yields nothing.
/// `count_references` shares this scan and agrees with it.
fn whole_word_matches<'t>(text: &'t str, name: &'t str) -> impl Iterator<Item = usize> + 't {
    let mut start = 0;
    std::iter::from_fn(move || {
        while let Some(offset) = text.get(start..).and_then(|rest| rest.find(name)) {
            let at = start + offset;
            start = at + name.len();

            let before_ok = text[..at].chars().next_back().is_none_or(|c| !is_identifier_char(c));
            let after_ok = text[start..].chars().next().is_none_or(|c| !is_identifier_char(c));
            if before_ok && after_ok {
                return Some(at);
            }
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::source::MemorySource;
    use crate::models::symbol::{Location, SymbolKind, SymbolRecord};
    use proptest::prelude::*;

    fn index_for(files: &[&str]) -> SymbolIndex {
        let mut index = SymbolIndex::new();
        for file in files {
            index.add_symbols(vec![SymbolRecord::new(
                "placeholder",
                SymbolKind::Variable,
                Location::new(*file, 1, 0),
            )]);
        }
        index
    }

    #[test]
    fn test_whole_word_boundaries() {
        let source = MemorySource::new()
            .with_file("a.py", "foobar\n")
            .with_file("b.py", "x.foo.y\n")
            .with_file("c.py", "foo(1)\n");

        for (file, expected) in [("a.py", 0), ("b.py", 1), ("c.py", 1)] {
            let index = index_for(&[file]);
            let finder = ReferenceFinder::new(&index, &source);
            assert_eq!(finder.find_all_references("foo", None).len(), expected, "{}", file);
            assert_eq!(finder.count_references("foo"), expected, "{}", file);
        }
    }

    #[test]
    fn test_candidates_do_not_overlap() {
        let source = MemorySource::new().with_file("a.py", "-a-a-\n");
        let index = index_for(&["a.py"]);
        let finder = ReferenceFinder::new(&index, &source);

        assert!(finder.find_all_references("-a-", None).is_empty());
        assert_eq!(finder.count_references("-a-"), 0);
    }

    #[test]
    fn test_reference_positions_and_context() {
        let source = MemorySource::new().with_file(
            "main.py",
            "from app import load\n\n    result = load(load_all())  \nload\n",
        );
        let index = index_for(&["main.py"]);
        let finder = ReferenceFinder::new(&index, &source);

        let refs = finder.find_all_references("load", None);
        let positions: Vec<_> = refs.iter().map(|r| (r.line, r.column)).collect();
        assert_eq!(positions, vec![(1, 16), (3, 13), (4, 0)]);
        assert_eq!(refs[1].context, "result = load(load_all())");
        assert_eq!(refs[0].file, PathBuf::from("main.py"));
    }

    #[test]
    fn test_columns_count_characters() {
        let source = MemorySource::new().with_file("u.py", "é = run()\n");
        let index = index_for(&["u.py"]);
        let finder = ReferenceFinder::new(&index, &source);

        let refs = finder.find_all_references("run", None);
        assert_eq!(refs[0].column, 4);
    }

    #[test]
    fn test_unicode_letters_are_identifier_chars() {
        let source = MemorySource::new().with_file("u.py", "éfoo foo\n");
        let index = index_for(&["u.py"]);
        let finder = ReferenceFinder::new(&index, &source);
        assert_eq!(finder.count_references("foo"), 1);
    }

    #[test]
    fn test_file_filter() {
        let source = MemorySource::new()
            .with_file("a.py", "target\n")
            .with_file("b.py", "target target\n");
        let index = index_for(&["a.py", "b.py"]);
        let finder = ReferenceFinder::new(&index, &source);

        let only_b = [PathBuf::from("b.py")];
        assert_eq!(finder.find_all_references("target", Some(&only_b)).len(), 2);
        assert_eq!(finder.find_all_references("target", Some(&[])).len(), 3);
    }

    #[test]
    fn test_unreadable_files_are_skipped() {
        let source = MemorySource::new().with_file("a.py", "name\n");
        let index = index_for(&["a.py", "deleted.py"]);
        let finder = ReferenceFinder::new(&index, &source);

        assert_eq!(finder.find_all_references("name", None).len(), 1);
        assert_eq!(finder.count_references("name"), 1);
    }

    #[test]
    fn test_unsearchable_names() {
        let source = MemorySource::new().with_file("a.py", "a\nb\n");
        let index = index_for(&["a.py"]);
        let finder = ReferenceFinder::new(&index, &source);

        assert!(finder.find_all_references("", None).is_empty());
        assert_eq!(finder.count_references("a\nb"), 0);
    }

    #[test]
    fn test_crlf_lines() {
        let source = MemorySource::new().with_file("w.py", "call()\r\ncall\r\n");
        let index = index_for(&["w.py"]);
        let finder = ReferenceFinder::new(&index, &source);

        assert_eq!(finder.find_all_references("call", None).len(), 2);
        assert_eq!(finder.count_references("call"), 2);
    }

    proptest! {
        #[test]
        fn prop_count_matches_find(
            contents in proptest::collection::vec("[a-c_ .()\n]{0,40}", 1..4),
            name in "[a-c_.]{1,3}",
        ) {
            let mut source = MemorySource::new();
            let files: Vec<String> = (0..contents.len()).map(|i| format!("f{}.py", i)).collect();
            for (file, content) in files.iter().zip(&contents) {
                source.insert(file.as_str(), content.as_str());
            }
            let file_refs: Vec<&str> = files.iter().map(String::as_str).collect();
            let index = index_for(&file_refs);
            let finder = ReferenceFinder::new(&index, &source);

            prop_assert_eq!(
                finder.count_references(&name),
                finder.find_all_references(&name, None).len()
            );
        }
    }
}
