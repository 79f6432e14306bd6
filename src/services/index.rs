//! In-memory symbol index with an optional JSON cache

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::infra::fuzzy::fuzzy_score;
use crate::models::symbol::{Location, SymbolKind, SymbolRecord};

/// Cache schema version; anything else is discarded on load
pub const CACHE_VERSION: &str = "1.0";

/// Counts reported by [`SymbolIndex::get_statistics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStatistics {
    pub total_symbols: usize,
    pub files_indexed: usize,
    pub classes: usize,
    pub functions: usize,
    pub methods: usize,
}

/// Authoritative store of indexed symbols.
///
/// Not internally synchronized: mutate it from one thread or behind one lock.
#[derive(Default)]
pub struct SymbolIndex {
    by_name: HashMap<String, Vec<Arc<SymbolRecord>>>,
    by_file: BTreeMap<PathBuf, Vec<Arc<SymbolRecord>>>,
    by_qualified: HashMap<String, Arc<SymbolRecord>>,
    /// (lower-cased name, record) in insertion order
    fuzzy: Vec<(String, Arc<SymbolRecord>)>,
    cache_path: Option<PathBuf>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index backed by a cache file, loaded immediately if present
    pub fn with_cache(path: impl Into<PathBuf>) -> Self {
        let mut index = Self {
            cache_path: Some(path.into()),
            ..Default::default()
        };
        index.load_from_cache();
        index
    }

    pub fn cache_path(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }

    pub fn add_symbols(&mut self, records: impl IntoIterator<Item = SymbolRecord>) {
        for record in records {
            let record = Arc::new(record);

            self.by_name
                .entry(record.name.clone())
                .or_default()
                .push(Arc::clone(&record));
            self.by_file
                .entry(record.file().to_path_buf())
                .or_default()
                .push(Arc::clone(&record));

            if let Some(previous) = self
                .by_qualified
                .insert(record.qualified_name().to_string(), Arc::clone(&record))
                && previous.file() != record.file()
            {
                tracing::debug!(
                    "Qualified name {} from {} replaces {}",
                    record.qualified_name(),
                    record.file().display(),
                    previous.file().display()
                );
            }

            self.fuzzy.push((record.name.to_lowercase(), record));
        }
    }

    /// Drop every record that came from `path`
    pub fn remove_file(&mut self, path: &Path) {
        let Some(removed) = self.by_file.remove(path) else {
            return;
        };

        for record in &removed {
            if let Some(bucket) = self.by_name.get_mut(&record.name) {
                bucket.retain(|r| r.file() != path);
                if bucket.is_empty() {
                    self.by_name.remove(&record.name);
                }
            }

            // a newer record from another file may own this qualified name
            if self
                .by_qualified
                .get(record.qualified_name())
                .is_some_and(|r| r.file() == path)
            {
                self.by_qualified.remove(record.qualified_name());
            }
        }

        self.fuzzy.retain(|(_, r)| r.file() != path);
        tracing::debug!("Removed {} symbols for {}", removed.len(), path.display());
    }

    pub fn clear(&mut self) {
        self.by_name.clear();
        self.by_file.clear();
        self.by_qualified.clear();
        self.fuzzy.clear();
    }

    /// Exact name lookup
    pub fn find_symbol(&self, name: &str) -> &[Arc<SymbolRecord>] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find_by_qualified_name(&self, qualified_name: &str) -> Option<&Arc<SymbolRecord>> {
        self.by_qualified.get(qualified_name)
    }

    /// Symbols of one file in parse order
    pub fn get_file_symbols(&self, path: &Path) -> &[Arc<SymbolRecord>] {
        self.by_file.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every indexed file, sorted
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.by_file.keys().map(PathBuf::as_path)
    }

    pub fn is_empty(&self) -> bool {
        self.by_file.is_empty()
    }

    /// Best `limit` matches by descending score; equal scores keep insertion order
    pub fn fuzzy_search(&self, pattern: &str, limit: usize) -> Vec<Arc<SymbolRecord>> {
        if pattern.is_empty() {
            return Vec::new();
        }
        let pattern = pattern.to_lowercase();

        let mut scored: Vec<(u32, &Arc<SymbolRecord>)> = self
            .fuzzy
            .iter()
            .filter_map(|(name, record)| match fuzzy_score(&pattern, name) {
                0 => None,
                score => Some((score, record)),
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, record)| Arc::clone(record))
            .collect()
    }

    pub fn get_statistics(&self) -> IndexStatistics {
        let mut stats = IndexStatistics {
            files_indexed: self.by_file.len(),
            ..Default::default()
        };

        for record in self.by_file.values().flatten() {
            stats.total_symbols += 1;
            match record.kind {
                SymbolKind::Class => stats.classes += 1,
                SymbolKind::Function => stats.functions += 1,
                SymbolKind::Method => stats.methods += 1,
                _ => {}
            }
        }

        stats
    }

    /// Write every record to the cache file, returning how many were saved
    pub fn save_to_cache(&self) -> Result<usize, CacheError> {
        let path = self.cache_path.as_deref().ok_or(CacheError::NoCachePath)?;

        let document = CacheDocument {
            version: Some(CACHE_VERSION.to_string()),
            timestamp: Some(Utc::now()),
            // Insertion order, so reloading replays collisions the same way
            symbols: self
                .fuzzy
                .iter()
                .map(|(_, r)| CachedSymbol::from(r.as_ref()))
                .collect(),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&document)?;
        std::fs::write(path, json)?;

        tracing::info!(
            "Saved {} symbols to {}",
            document.symbols.len(),
            path.display()
        );
        Ok(document.symbols.len())
    }

    /// Load the cache file into the index; failures leave the index as it was
    pub fn load_from_cache(&mut self) -> usize {
        let Some(path) = self.cache_path.clone() else {
            return 0;
        };
        if !path.exists() {
            return 0;
        }

        match read_cache(&path) {
            Ok(records) => {
                let count = records.len();
                self.add_symbols(records);
                tracing::info!("Loaded {} symbols from {}", count, path.display());
                count
            }
            Err(e) => {
                tracing::warn!("Ignoring symbol cache {}: {}", path.display(), e);
                0
            }
        }
    }
}

fn read_cache(path: &Path) -> Result<Vec<SymbolRecord>, CacheError> {
    let content = std::fs::read_to_string(path)?;
    let document: CacheDocument = serde_json::from_str(&content)?;

    if document.version.as_deref() != Some(CACHE_VERSION) {
        return Err(CacheError::IncompatibleVersion {
            found: document.version,
            expected: CACHE_VERSION,
        });
    }

    Ok(document.symbols.into_iter().map(SymbolRecord::from).collect())
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheDocument {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    symbols: Vec<CachedSymbol>,
}

/// Flat form of a [`SymbolRecord`] as stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CachedSymbol {
    name: String,
    /// Unrecognised kinds load as `unknown` instead of rejecting the cache
    #[serde(default)]
    kind: String,
    file: PathBuf,
    line: u32,
    #[serde(default)]
    column: u32,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    children: Vec<String>,
    #[serde(default)]
    parameters: Vec<String>,
    #[serde(default)]
    decorators: Vec<String>,
    #[serde(default)]
    doc_comment: Option<String>,
    #[serde(default)]
    base_types: Vec<String>,
    /// References are computed on demand; always written empty
    #[serde(default)]
    references: Vec<serde_json::Value>,
}

impl From<&SymbolRecord> for CachedSymbol {
    fn from(record: &SymbolRecord) -> Self {
        Self {
            name: record.name.clone(),
            kind: record.kind.to_string(),
            file: record.location.file.clone(),
            line: record.location.line,
            column: record.location.column,
            parent: record.parent().map(str::to_string),
            children: record.children.clone(),
            parameters: record.parameters.clone(),
            decorators: record.decorators.clone(),
            doc_comment: record.doc_comment.clone(),
            base_types: record.base_types.clone(),
            references: Vec::new(),
        }
    }
}

impl From<CachedSymbol> for SymbolRecord {
    fn from(cached: CachedSymbol) -> Self {
        SymbolRecord::new(
            cached.name,
            SymbolKind::from_str_loose(&cached.kind),
            Location::new(cached.file, cached.line, cached.column),
        )
        .with_parent(cached.parent)
        .with_children(cached.children)
        .with_parameters(cached.parameters)
        .with_decorators(cached.decorators)
        .with_doc_comment(cached.doc_comment)
        .with_base_types(cached.base_types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(name: &str, kind: SymbolKind, file: &str, line: u32) -> SymbolRecord {
        SymbolRecord::new(name, kind, Location::new(file, line, 0))
    }

    fn method(name: &str, parent: &str, file: &str, line: u32) -> SymbolRecord {
        record(name, SymbolKind::Method, file, line).with_parent(Some(parent.to_string()))
    }

    fn sample_index() -> SymbolIndex {
        let mut index = SymbolIndex::new();
        index.add_symbols(vec![
            record("Foo", SymbolKind::Class, "a.py", 1)
                .with_children(vec!["bar".to_string(), "baz".to_string()]),
            method("bar", "Foo", "a.py", 2),
            method("baz", "Foo", "a.py", 4),
        ]);
        index.add_symbols(vec![
            record("helper", SymbolKind::Function, "b.py", 1),
            record("bar", SymbolKind::Function, "b.py", 5),
        ]);
        index
    }

    #[test]
    fn test_find_symbol() {
        let index = sample_index();

        let bars = index.find_symbol("bar");
        assert_eq!(bars.len(), 2);
        assert!(index.find_symbol("missing").is_empty());

        let foo_bar = index.find_by_qualified_name("Foo.bar").unwrap();
        assert_eq!(foo_bar.parent(), Some("Foo"));
        assert!(index.find_by_qualified_name("Foo.nope").is_none());
    }

    #[test]
    fn test_get_file_symbols_in_parse_order() {
        let index = sample_index();
        let names: Vec<_> = index
            .get_file_symbols(Path::new("a.py"))
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Foo", "bar", "baz"]);
        assert!(index.get_file_symbols(Path::new("c.py")).is_empty());
    }

    #[test]
    fn test_remove_file() {
        let mut index = sample_index();
        index.remove_file(Path::new("a.py"));

        assert!(index.get_file_symbols(Path::new("a.py")).is_empty());
        assert!(index.find_symbol("Foo").is_empty());
        assert!(!index.by_name.contains_key("baz"));
        assert_eq!(index.find_symbol("bar").len(), 1);
        assert!(index.find_by_qualified_name("Foo.bar").is_none());
        assert!(index.fuzzy_search("baz", 10).is_empty());
        assert_eq!(index.files().collect::<Vec<_>>(), vec![Path::new("b.py")]);
    }

    #[test]
    fn test_reindex_replaces_file_symbols() {
        let mut index = sample_index();
        index.remove_file(Path::new("a.py"));
        index.add_symbols(vec![
            record("Foo", SymbolKind::Class, "a.py", 1),
            method("qux", "Foo", "a.py", 2),
        ]);

        let names: Vec<_> = index
            .get_file_symbols(Path::new("a.py"))
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Foo", "qux"]);
        assert_eq!(index.find_symbol("Foo").len(), 1);
        assert_eq!(index.get_statistics().total_symbols, 4);
    }

    #[test]
    fn test_qualified_name_later_insert_wins() {
        let mut index = SymbolIndex::new();
        index.add_symbols(vec![record("run", SymbolKind::Function, "a.py", 1)]);
        index.add_symbols(vec![record("run", SymbolKind::Function, "b.py", 7)]);

        let winner = index.find_by_qualified_name("run").unwrap();
        assert_eq!(winner.file(), Path::new("b.py"));

        // removing the losing file keeps the winner
        index.remove_file(Path::new("a.py"));
        assert_eq!(
            index.find_by_qualified_name("run").unwrap().file(),
            Path::new("b.py")
        );
    }

    #[test]
    fn test_fuzzy_search_ordering() {
        let mut index = SymbolIndex::new();
        index.add_symbols(vec![
            record("get_config", SymbolKind::Function, "a.py", 1),
            record("ConfigLoader", SymbolKind::Class, "a.py", 3),
            record("config", SymbolKind::Variable, "a.py", 9),
            record("unrelated", SymbolKind::Function, "a.py", 12),
        ]);

        let names: Vec<_> = index
            .fuzzy_search("Config", 10)
            .iter()
            .map(|r| r.name.clone())
            .collect();
        // substring at index 0 ties; insertion order breaks the tie
        assert_eq!(names, vec!["ConfigLoader", "config", "get_config"]);

        assert_eq!(index.fuzzy_search("config", 1).len(), 1);
        assert!(index.fuzzy_search("", 10).is_empty());
    }

    #[test]
    fn test_fuzzy_search_subsequence() {
        let index = sample_index();
        let names: Vec<_> = index
            .fuzzy_search("hlp", 10)
            .iter()
            .map(|r| r.name.clone())
            .collect();
        assert_eq!(names, vec!["helper"]);
    }

    #[test]
    fn test_statistics() {
        let index = sample_index();
        assert_eq!(
            index.get_statistics(),
            IndexStatistics {
                total_symbols: 5,
                files_indexed: 2,
                classes: 1,
                functions: 2,
                methods: 2,
            }
        );
    }

    #[test]
    fn test_clear() {
        let mut index = sample_index();
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.get_statistics(), IndexStatistics::default());
    }

    #[test]
    fn test_cache_round_trip() {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join(".codenav/symbol_index.json");

        let mut index = SymbolIndex::with_cache(&cache);
        index.add_symbols(
            sample_index()
                .by_file
                .values()
                .flatten()
                .map(|r| r.as_ref().clone()),
        );
        index.add_symbols(vec![
            record("Point", SymbolKind::Class, "c.py", 3)
                .with_base_types(vec!["Base".to_string()])
                .with_decorators(vec!["dataclass".to_string()])
                .with_doc_comment(Some("A point.".to_string())),
        ]);
        assert_eq!(index.save_to_cache().unwrap(), 6);

        let loaded = SymbolIndex::with_cache(&cache);
        assert_eq!(loaded.get_statistics(), index.get_statistics());

        let point = loaded.find_by_qualified_name("Point").unwrap();
        assert_eq!(point.base_types, vec!["Base"]);
        assert_eq!(point.decorators, vec!["dataclass"]);
        assert_eq!(point.doc_comment.as_deref(), Some("A point."));
        assert_eq!(
            loaded.find_by_qualified_name("Foo.baz").unwrap().line(),
            4
        );
    }

    #[test]
    fn test_cache_keeps_insertion_order() {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join("index.json");

        let mut index = SymbolIndex::with_cache(&cache);
        index.add_symbols(vec![record("run", SymbolKind::Function, "b.py", 1)]);
        index.add_symbols(vec![record("run", SymbolKind::Function, "a.py", 7)]);
        assert_eq!(
            index.find_by_qualified_name("run").unwrap().file(),
            Path::new("a.py")
        );
        index.save_to_cache().unwrap();

        let loaded = SymbolIndex::with_cache(&cache);
        assert_eq!(
            loaded.find_by_qualified_name("run").unwrap().file(),
            Path::new("a.py")
        );
        let files: Vec<_> = loaded
            .fuzzy_search("run", 10)
            .iter()
            .map(|r| r.file().to_path_buf())
            .collect();
        assert_eq!(files, vec![PathBuf::from("b.py"), PathBuf::from("a.py")]);
    }

    #[test]
    fn test_cache_document_shape() {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join("index.json");

        let mut index = SymbolIndex::with_cache(&cache);
        index.add_symbols(vec![method("bar", "Foo", "a.py", 2)]);
        index.save_to_cache().unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&cache).unwrap()).unwrap();
        assert_eq!(json["version"], "1.0");
        assert!(json["timestamp"].is_string());
        let symbol = &json["symbols"][0];
        assert_eq!(symbol["kind"], "method");
        assert_eq!(symbol["parent"], "Foo");
        assert_eq!(symbol["references"], serde_json::json!([]));
    }

    #[test]
    fn test_incompatible_cache_is_ignored() {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join("index.json");

        std::fs::write(
            &cache,
            r#"{"version": "0.9", "symbols": [{"name": "x", "file": "a.py", "line": 1}]}"#,
        )
        .unwrap();
        assert!(SymbolIndex::with_cache(&cache).is_empty());

        std::fs::write(&cache, r#"{"symbols": []}"#).unwrap();
        assert!(SymbolIndex::with_cache(&cache).is_empty());

        std::fs::write(&cache, "not json").unwrap();
        assert!(SymbolIndex::with_cache(&cache).is_empty());
    }

    #[test]
    fn test_cache_unknown_kind_loads_as_unknown() {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join("index.json");
        std::fs::write(
            &cache,
            r#"{"version": "1.0", "symbols": [
                {"name": "Widget", "kind": "widget", "file": "a.py", "line": 3},
                {"name": "run", "file": "a.py", "line": 9}
            ]}"#,
        )
        .unwrap();

        let index = SymbolIndex::with_cache(&cache);
        assert_eq!(index.find_symbol("Widget")[0].kind, SymbolKind::Unknown);
        assert_eq!(index.find_symbol("run")[0].kind, SymbolKind::Unknown);
        assert_eq!(index.find_symbol("run")[0].column(), 0);
    }

    #[test]
    fn test_save_without_cache_path() {
        let err = SymbolIndex::new().save_to_cache().unwrap_err();
        assert!(matches!(err, CacheError::NoCachePath));
    }
}
