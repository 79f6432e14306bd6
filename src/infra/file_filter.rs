//! Workspace file discovery
//!
//! Uses the `ignore` crate (from ripgrep) for `.gitignore` handling and adds
//! the directory/extension skip lists every scan applies.

use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;
use ignore::gitignore::{Gitignore, GitignoreBuilder};

/// File filter configuration
#[derive(Debug, Clone)]
pub struct FileFilterConfig {
    /// Root directory for relative path resolution
    pub root: PathBuf,
    /// Use .gitignore files for filtering
    pub respect_gitignore: bool,
    /// Use .codenav/ignore for filtering
    pub respect_local_ignore: bool,
    /// Extra directory or file names to skip (exact component match)
    pub ignored_names: Vec<String>,
    /// Hidden files/directories (starting with .)
    pub include_hidden: bool,
    /// Files larger than this are skipped
    pub max_file_size: u64,
}

impl Default for FileFilterConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            respect_gitignore: true,
            respect_local_ignore: true,
            ignored_names: Vec::new(),
            include_hidden: false,
            max_file_size: 10 * 1024 * 1024,
        }
    }
}

/// File filter with gitignore integration
pub struct FileFilter {
    config: FileFilterConfig,
    local_ignore: Option<Gitignore>,
}

impl FileFilter {
    pub fn new(config: FileFilterConfig) -> Self {
        let local_ignore = if config.respect_local_ignore {
            Self::load_local_ignore(&config.root)
        } else {
            None
        };

        Self {
            config,
            local_ignore,
        }
    }

    pub fn for_root(root: impl AsRef<Path>) -> Self {
        Self::new(FileFilterConfig {
            root: root.as_ref().to_path_buf(),
            ..Default::default()
        })
    }

    /// Load .codenav/ignore (gitignore syntax)
    fn load_local_ignore(root: &Path) -> Option<Gitignore> {
        let ignore_path = root.join(".codenav").join("ignore");
        if !ignore_path.exists() {
            return None;
        }

        let mut builder = GitignoreBuilder::new(root);
        if let Some(err) = builder.add(&ignore_path) {
            tracing::warn!("Failed to parse .codenav/ignore: {}", err);
        }

        builder.build().ok()
    }

    fn is_ignored_name(&self, name: &str) -> bool {
        if DEFAULT_IGNORED_DIRS.contains(&name)
            || self.config.ignored_names.iter().any(|n| n == name)
        {
            return true;
        }
        IGNORED_EXTENSIONS
            .iter()
            .any(|ext| name.ends_with(&format!(".{}", ext)))
    }

    /// Check if a path should be skipped
    pub fn is_ignored(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.config.root).unwrap_or(path);

        for component in relative.components() {
            if let Component::Normal(name) = component
                && let Some(name) = name.to_str()
            {
                if self.is_ignored_name(name) {
                    return true;
                }
                if !self.config.include_hidden && name.starts_with('.') {
                    return true;
                }
            }
        }

        if let Some(ref ignore) = self.local_ignore {
            match ignore.matched(relative, path.is_dir()) {
                ignore::Match::Ignore(_) => return true,
                ignore::Match::Whitelist(_) => return false,
                ignore::Match::None => {}
            }
        }

        false
    }

    pub fn should_include(&self, path: &Path) -> bool {
        !self.is_ignored(path)
    }

    fn walk_builder(&self) -> WalkBuilder {
        let mut builder = WalkBuilder::new(&self.config.root);

        builder
            .hidden(!self.config.include_hidden)
            .git_ignore(self.config.respect_gitignore)
            .git_global(self.config.respect_gitignore)
            .git_exclude(self.config.respect_gitignore)
            .require_git(false);

        builder
    }

    /// Walk the root and yield every file that passes the filters, stopping
    /// after `limit` files (0 = unlimited)
    pub fn discover(&self, extensions: &[&str], limit: usize) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry in self.walk_builder().build().filter_map(|e| e.ok()) {
            if limit > 0 && files.len() >= limit {
                tracing::info!("Reached limit of {} files", limit);
                break;
            }

            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            if !extensions.is_empty() {
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_lowercase())
                    .unwrap_or_default();
                if !extensions.contains(&ext.as_str()) {
                    continue;
                }
            }

            if !self.should_include(path) {
                continue;
            }

            match entry.metadata() {
                Ok(meta) if meta.len() > self.config.max_file_size => {
                    tracing::warn!(
                        "Skipping large file ({}MB): {}",
                        meta.len() / 1024 / 1024,
                        path.display()
                    );
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("Cannot stat {}: {}", path.display(), e);
                    continue;
                }
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        files
    }

    /// Files with one of the given extensions (empty = any extension)
    pub fn discover_files(&self, extensions: &[&str]) -> Vec<PathBuf> {
        self.discover(extensions, 0)
    }
}

/// Directories never worth scanning
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    // Version control
    ".git",
    ".svn",
    ".hg",
    // Dependencies
    "node_modules",
    ".venv",
    "venv",
    "env",
    "workspace-env",
    "site-packages",
    "__pycache__",
    "eggs",
    ".eggs",
    // Build outputs
    "target",
    "dist",
    "build",
    // IDE/Editor
    ".idea",
    ".vscode",
    // Caches
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    ".cache",
    // Codenav
    ".codenav",
];

/// Binary and generated file extensions
pub const IGNORED_EXTENSIONS: &[&str] = &[
    "pyc", "pyo", "so", "dylib", "dll", "exe", "o", "a", "class", "jar", "war", "log", "tmp",
    "cache",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_ignores() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let filter = FileFilter::for_root(root);

        assert!(filter.should_include(&root.join("src/main.py")));
        assert!(!filter.should_include(&root.join("node_modules/x/index.js")));
        assert!(!filter.should_include(&root.join("pkg/__pycache__/m.pyc")));
        assert!(!filter.should_include(&root.join(".hidden/a.py")));
        assert!(!filter.should_include(&root.join("lib/native.so")));
    }

    #[test]
    fn test_configured_names() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let filter = FileFilter::new(FileFilterConfig {
            root: root.to_path_buf(),
            ignored_names: vec!["generated".to_string()],
            ..Default::default()
        });

        assert!(!filter.should_include(&root.join("generated/api.py")));
        assert!(filter.should_include(&root.join("api.py")));
    }

    #[test]
    fn test_local_ignore() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join(".codenav")).unwrap();
        fs::write(root.join(".codenav/ignore"), "*_test.go\n").unwrap();

        let filter = FileFilter::for_root(root);

        assert!(filter.should_include(&root.join("main.go")));
        assert!(!filter.should_include(&root.join("main_test.go")));
    }

    #[test]
    fn test_discover_files_by_extension() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::write(root.join("a.py"), "x = 1").unwrap();
        fs::write(root.join("b.go"), "package b").unwrap();
        fs::write(root.join("notes.txt"), "hi").unwrap();
        fs::create_dir(root.join("venv")).unwrap();
        fs::write(root.join("venv/c.py"), "y = 2").unwrap();

        let filter = FileFilter::for_root(root);
        let files = filter.discover_files(&["py", "go"]);

        assert_eq!(files, vec![root.join("a.py"), root.join("b.go")]);
    }

    #[test]
    fn test_discover_respects_size_and_limit() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::write(root.join("small.py"), "x").unwrap();
        fs::write(root.join("large.py"), "x".repeat(64)).unwrap();

        let filter = FileFilter::new(FileFilterConfig {
            root: root.to_path_buf(),
            max_file_size: 16,
            ..Default::default()
        });
        assert_eq!(filter.discover_files(&[]), vec![root.join("small.py")]);

        fs::write(root.join("another.py"), "y").unwrap();
        assert_eq!(filter.discover(&[], 1).len(), 1);
    }
}
