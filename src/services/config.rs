//! Configuration service for Codenav

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::ConfigError;
use crate::models::config::{CodenavConfig, ProjectConfig};

#[async_trait]
pub trait ConfigService: Send + Sync {
    async fn load(&self, global_only: bool) -> Result<CodenavConfig, ConfigError>;
    fn config_path(&self, global: bool) -> PathBuf;
    async fn init(&self, global: bool, force: bool) -> Result<PathBuf, ConfigError>;
}

pub struct DefaultConfigService {
    root: PathBuf,
}

impl DefaultConfigService {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn global_config_path() -> PathBuf {
        // XDG standard: ~/.config/codenav/config.toml
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("codenav")
            .join("config.toml")
    }

    fn project_config_path(&self) -> PathBuf {
        self.root.join(".codenav").join("config.toml")
    }

    async fn load_from_path(path: &Path) -> Result<Option<CodenavConfig>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = tokio::fs::read_to_string(path).await?;
        let config = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(Some(config))
    }

    async fn write_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let config = CodenavConfig::default();
        let content =
            toml::to_string_pretty(&config).map_err(|e| ConfigError::Parse(e.to_string()))?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl ConfigService for DefaultConfigService {
    async fn load(&self, global_only: bool) -> Result<CodenavConfig, ConfigError> {
        let global = Self::load_from_path(&Self::global_config_path()).await?;
        if global_only {
            return Ok(global.unwrap_or_default());
        }

        let project = Self::load_from_path(&self.project_config_path()).await?;
        let config = match (global, project) {
            (Some(base), Some(overlay)) => merge_config(base, overlay),
            (base, overlay) => overlay.or(base).unwrap_or_default(),
        };
        apply_env_overrides(config)
    }

    fn config_path(&self, global: bool) -> PathBuf {
        if global {
            Self::global_config_path()
        } else {
            self.project_config_path()
        }
    }

    async fn init(&self, global: bool, force: bool) -> Result<PathBuf, ConfigError> {
        let path = self.config_path(global);

        if path.exists() && !force {
            return Err(ConfigError::InvalidValue {
                key: "config".to_string(),
                message: format!(
                    "Config already exists: {}. Use --force to overwrite.",
                    path.display()
                ),
            });
        }

        Self::write_default_config(&path).await?;
        Ok(path)
    }
}

/// Project settings win; the project name and languages fall back to global
fn merge_config(base: CodenavConfig, overlay: CodenavConfig) -> CodenavConfig {
    CodenavConfig {
        project: ProjectConfig {
            name: overlay.project.name.or(base.project.name),
            languages: if overlay.project.languages.is_empty() {
                base.project.languages
            } else {
                overlay.project.languages
            },
            ignored_paths: overlay.project.ignored_paths,
        },
        index: overlay.index,
        search: overlay.search,
        output: overlay.output,
    }
}

fn apply_env_overrides(mut config: CodenavConfig) -> Result<CodenavConfig, ConfigError> {
    if let Ok(val) = std::env::var("CODENAV_SEARCH_LIMIT") {
        config.search.symbol_limit = parse_env("CODENAV_SEARCH_LIMIT", &val)?;
    }
    if let Ok(val) = std::env::var("CODENAV_MAX_FILE_SIZE_MB") {
        config.index.max_file_size_mb = parse_env("CODENAV_MAX_FILE_SIZE_MB", &val)?;
    }
    Ok(config)
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{}': {}", value, e),
        })
}
