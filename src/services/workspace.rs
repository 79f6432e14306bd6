//! Workspace-wide indexing and quick-open file search

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use walkdir::WalkDir;

use crate::infra::file_filter::{
    DEFAULT_IGNORED_DIRS, FileFilter, FileFilterConfig, IGNORED_EXTENSIONS,
};
use crate::infra::fuzzy::score_path;
use crate::infra::source::SourceProvider;
use crate::models::config::CodenavConfig;
use crate::models::symbol::Language;
use crate::services::index::SymbolIndex;
use crate::services::indexer::FileIndexer;

/// Quick-open never lists more than this many files
pub const MAX_SCANNED_FILES: usize = 20_000;

/// Quick-open skips files above this size
pub const MAX_SCANNED_FILE_SIZE: u64 = 10_000_000;

const PROGRESS_INTERVAL: usize = 10;

/// Summary of one indexing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    pub files_scanned: usize,
    pub files_indexed: usize,
    pub total_symbols: usize,
}

/// A file offered by quick-open
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceFile {
    /// Path shown to the user, starting with the project directory name
    pub relative: String,
    pub path: PathBuf,
}

/// Re-indexes every supported file under a set of roots
pub struct WorkspaceIndexer {
    indexer: FileIndexer,
    extensions: Vec<String>,
    ignored_names: Vec<String>,
    max_file_size: u64,
}

impl WorkspaceIndexer {
    pub fn new(config: &CodenavConfig, source: Arc<dyn SourceProvider>) -> Self {
        let extensions = if config.index.extensions.is_empty() {
            Language::all_extensions()
                .into_iter()
                .map(str::to_string)
                .collect()
        } else {
            config
                .index
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect()
        };

        Self {
            indexer: FileIndexer::new(source),
            extensions,
            ignored_names: config.project.ignored_paths.clone(),
            max_file_size: config.index.max_file_size_bytes(),
        }
    }

    fn filter_for(&self, root: &Path) -> FileFilter {
        FileFilter::new(FileFilterConfig {
            root: root.to_path_buf(),
            ignored_names: self.ignored_names.clone(),
            max_file_size: self.max_file_size,
            ..Default::default()
        })
    }

    /// Files under `root` that would be indexed
    pub fn discover(&self, root: &Path) -> Vec<PathBuf> {
        if root.is_file() {
            return vec![root.to_path_buf()];
        }
        let extensions: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        self.filter_for(root).discover_files(&extensions)
    }

    /// Replace the symbols of every discovered file under `roots`
    pub fn index_roots(&self, index: &mut SymbolIndex, roots: &[PathBuf]) -> IndexReport {
        let files: Vec<PathBuf> = roots
            .iter()
            .filter(|root| {
                let exists = root.exists();
                if !exists {
                    tracing::warn!("Skipping missing path {}", root.display());
                }
                exists
            })
            .flat_map(|root| self.discover(root))
            .collect();

        self.index_files(index, &files)
    }

    pub fn index_files(&self, index: &mut SymbolIndex, files: &[PathBuf]) -> IndexReport {
        let mut report = IndexReport {
            files_scanned: files.len(),
            ..Default::default()
        };

        for (i, path) in files.iter().enumerate() {
            index.remove_file(path);
            let symbols = self.indexer.index_file(path);
            report.total_symbols += symbols.len();
            report.files_indexed += 1;
            index.add_symbols(symbols);

            if (i + 1) % PROGRESS_INTERVAL == 0 {
                tracing::info!("Indexing: {}/{} files...", report.files_indexed, files.len());
            }
        }

        tracing::info!(
            "Indexed {} symbols from {} files",
            report.total_symbols,
            report.files_indexed
        );
        report
    }
}

/// List files for quick-open, sorted by relative path
pub fn scan_files(roots: &[PathBuf]) -> Vec<WorkspaceFile> {
    let mut files = Vec::new();

    'roots: for root in roots {
        if !root.exists() {
            continue;
        }
        let base = root.parent().unwrap_or(root);
        tracing::debug!("Scanning {}", root.display());

        let walker = WalkDir::new(root).into_iter().filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            e.depth() == 0
                || !(name.starts_with('.')
                    || (e.file_type().is_dir() && DEFAULT_IGNORED_DIRS.contains(&&*name)))
        });

        for entry in walker.filter_map(|e| e.ok()) {
            if files.len() >= MAX_SCANNED_FILES {
                tracing::info!("Reached limit of {} files", MAX_SCANNED_FILES);
                break 'roots;
            }
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if IGNORED_EXTENSIONS
                .iter()
                .any(|ext| name.ends_with(&format!(".{}", ext)))
            {
                continue;
            }
            match entry.metadata() {
                Ok(meta) if meta.len() <= MAX_SCANNED_FILE_SIZE => {}
                _ => continue,
            }

            let Ok(relative) = entry.path().strip_prefix(base) else {
                continue;
            };
            files.push(WorkspaceFile {
                relative: relative.to_string_lossy().replace('\\', "/"),
                path: entry.path().to_path_buf(),
            });
        }
    }

    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    files
}

/// Quick-open ranking: an empty pattern lists the first `limit` files,
/// otherwise matches by descending score with ties in listing order
pub fn search_files<'a>(
    files: &'a [WorkspaceFile],
    pattern: &str,
    limit: usize,
) -> Vec<(u32, &'a WorkspaceFile)> {
    if pattern.is_empty() {
        return files.iter().take(limit).map(|f| (1, f)).collect();
    }

    let mut scored: Vec<(u32, &WorkspaceFile)> = files
        .iter()
        .filter_map(|f| match score_path(pattern, &f.relative) {
            0 => None,
            score => Some((score, f)),
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::source::FsSource;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "app/models.py", "class User:\n    def save(self):\n        pass\n");
        write(root, "app/server.go", "package app\n\nfunc Serve() {}\n");
        write(root, "venv/lib/site.py", "def hidden():\n    pass\n");
        write(root, ".git/hooks/x.py", "def hook():\n    pass\n");
        write(root, "README.md", "# readme\n");
        temp
    }

    #[test]
    fn test_index_roots() {
        let temp = project();
        let workspace = WorkspaceIndexer::new(&CodenavConfig::default(), Arc::new(FsSource));
        let mut index = SymbolIndex::new();

        let report = workspace.index_roots(&mut index, &[temp.path().to_path_buf()]);
        assert_eq!(
            report,
            IndexReport {
                files_scanned: 2,
                files_indexed: 2,
                total_symbols: 3,
            }
        );
        assert_eq!(index.find_symbol("save").len(), 1);
        assert!(index.find_symbol("hidden").is_empty());
        assert!(index.find_symbol("hook").is_empty());
    }

    #[test]
    fn test_reindex_is_idempotent() {
        let temp = project();
        let workspace = WorkspaceIndexer::new(&CodenavConfig::default(), Arc::new(FsSource));
        let mut index = SymbolIndex::new();
        let roots = [temp.path().to_path_buf()];

        workspace.index_roots(&mut index, &roots);
        write(temp.path(), "app/models.py", "class User:\n    def delete(self):\n        pass\n");
        workspace.index_roots(&mut index, &roots);

        assert!(index.find_symbol("save").is_empty());
        assert_eq!(index.find_symbol("delete").len(), 1);
        assert_eq!(index.find_symbol("User").len(), 1);
        assert_eq!(index.get_statistics().total_symbols, 3);
    }

    #[test]
    fn test_configured_extensions() {
        let temp = project();
        let mut config = CodenavConfig::default();
        config.index.extensions = vec![".go".to_string()];
        let workspace = WorkspaceIndexer::new(&config, Arc::new(FsSource));

        let files = workspace.discover(temp.path());
        assert_eq!(files, vec![temp.path().join("app/server.go")]);
    }

    #[test]
    fn test_index_single_file_root() {
        let temp = project();
        let workspace = WorkspaceIndexer::new(&CodenavConfig::default(), Arc::new(FsSource));
        let mut index = SymbolIndex::new();

        let report = workspace.index_roots(
            &mut index,
            &[temp.path().join("app/models.py"), temp.path().join("missing")],
        );
        assert_eq!(report.files_indexed, 1);
        assert_eq!(report.total_symbols, 2);
    }

    #[test]
    fn test_scan_files() {
        let temp = project();
        write(temp.path(), "app/native.so", "bin");
        let root = temp.path().to_path_buf();
        let project_name = root.file_name().unwrap().to_string_lossy().to_string();

        let files = scan_files(&[root]);
        let relative: Vec<_> = files.iter().map(|f| f.relative.clone()).collect();
        assert_eq!(
            relative,
            vec![
                format!("{}/README.md", project_name),
                format!("{}/app/models.py", project_name),
                format!("{}/app/server.go", project_name),
            ]
        );
    }

    #[test]
    fn test_search_files() {
        let files: Vec<WorkspaceFile> = ["proj/src/main.rs", "proj/src/deep/nested/mod.rs", "proj/README.md"]
            .iter()
            .map(|rel| WorkspaceFile {
                relative: rel.to_string(),
                path: PathBuf::from(rel),
            })
            .collect();

        let results = search_files(&files, "main", 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].1.relative, "proj/src/main.rs");

        let all = search_files(&files, "", 2);
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|(score, _)| *score == 1));

        assert!(search_files(&files, "zzz", 10).is_empty());
    }
}
