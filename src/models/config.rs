//! Configuration model for Codenav

use serde::{Deserialize, Serialize};

use crate::models::symbol::Language;

/// Codenav configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CodenavConfig {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Project configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: Option<String>,

    /// Languages detected at `codenav init`
    #[serde(default)]
    pub languages: Vec<Language>,

    /// Paths to ignore
    #[serde(default = "default_ignored_paths")]
    pub ignored_paths: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: None,
            languages: Vec::new(),
            ignored_paths: default_ignored_paths(),
        }
    }
}

fn default_ignored_paths() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        ".git".to_string(),
        "target".to_string(),
        "dist".to_string(),
        "build".to_string(),
        "__pycache__".to_string(),
        ".venv".to_string(),
        "venv".to_string(),
        "env".to_string(),
        ".codenav".to_string(),
    ]
}

/// Symbol index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Cache file name inside `.codenav/`
    #[serde(default = "defaults::cache_file")]
    pub cache_file: String,

    /// Files above this size are skipped (0 = unlimited)
    #[serde(default = "defaults::max_file_size_mb")]
    pub max_file_size_mb: u32,

    /// Persist the index after `codenav index`
    #[serde(default = "defaults::auto_save")]
    pub auto_save: bool,

    /// Extensions to index (empty = every extension with a parsing strategy)
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            cache_file: defaults::cache_file(),
            max_file_size_mb: defaults::max_file_size_mb(),
            auto_save: defaults::auto_save(),
            extensions: Vec::new(),
        }
    }
}

impl IndexConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        if self.max_file_size_mb == 0 {
            u64::MAX
        } else {
            self.max_file_size_mb as u64 * 1024 * 1024
        }
    }
}

mod defaults {
    // Index
    pub fn cache_file() -> String {
        "symbol_index.json".to_string()
    }
    pub fn max_file_size_mb() -> u32 {
        10
    }
    pub fn auto_save() -> bool {
        true
    }

    // Search
    pub fn symbol_limit() -> usize {
        50
    }
    pub fn file_limit() -> usize {
        100
    }
    pub fn refs_limit() -> usize {
        500
    }

    // Output
    pub fn format() -> String {
        "json".to_string()
    }
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "defaults::symbol_limit")]
    pub symbol_limit: usize,

    #[serde(default = "defaults::file_limit")]
    pub file_limit: usize,

    #[serde(default = "defaults::refs_limit")]
    pub refs_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            symbol_limit: defaults::symbol_limit(),
            file_limit: defaults::file_limit(),
            refs_limit: defaults::refs_limit(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "defaults::format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: defaults::format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CodenavConfig::default();
        assert_eq!(config.index.cache_file, "symbol_index.json");
        assert_eq!(config.index.max_file_size_mb, 10);
        assert!(config.index.auto_save);
        assert_eq!(config.search.symbol_limit, 50);
        assert_eq!(config.search.file_limit, 100);
        assert_eq!(config.output.format, "json");
    }

    #[test]
    fn test_ignored_paths() {
        let config = CodenavConfig::default();
        assert!(
            config
                .project
                .ignored_paths
                .contains(&".codenav".to_string())
        );
        assert!(
            config
                .project
                .ignored_paths
                .contains(&"__pycache__".to_string())
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: CodenavConfig = toml::from_str("[search]\nsymbol_limit = 7\n").unwrap();
        assert_eq!(config.search.symbol_limit, 7);
        assert_eq!(config.search.refs_limit, 500);
        assert_eq!(config.index.max_file_size_mb, 10);
    }

    #[test]
    fn test_unlimited_file_size() {
        let index = IndexConfig {
            max_file_size_mb: 0,
            ..Default::default()
        };
        assert_eq!(index.max_file_size_bytes(), u64::MAX);
    }
}
