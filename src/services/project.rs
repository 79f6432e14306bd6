//! Project service for Codenav

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::ProjectError;
use crate::infra::file_filter::DEFAULT_IGNORED_DIRS;
use crate::models::config::{CodenavConfig, ProjectConfig};
use crate::models::symbol::Language;

/// Project service trait
#[async_trait]
pub trait ProjectService: Send + Sync {
    /// Initialize a new project
    async fn init(&self, name: Option<&str>, force: bool) -> Result<ProjectInfo, ProjectError>;

    /// Get project status
    async fn status(&self) -> Result<ProjectStatus, ProjectError>;

    /// Check if project is initialized
    fn is_initialized(&self) -> bool;

    /// Detect languages in project
    fn detect_languages(&self) -> Vec<Language>;
}

/// Project information
#[derive(Debug, Clone)]
pub struct ProjectInfo {
    pub name: String,
    pub root: PathBuf,
    pub languages: Vec<Language>,
    pub config_path: PathBuf,
}

/// Project status
#[derive(Debug, Clone)]
pub struct ProjectStatus {
    pub initialized: bool,
    pub project: Option<ProjectInfo>,
}

/// Default project service
pub struct DefaultProjectService {
    root: PathBuf,
}

impl DefaultProjectService {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// `.codenav/` under the project root
    pub fn codenav_dir(&self) -> PathBuf {
        self.root.join(".codenav")
    }

    fn config_path(&self) -> PathBuf {
        self.codenav_dir().join("config.toml")
    }

    fn default_name(&self) -> String {
        self.root
            .file_name()
            .and_then(|n| n.to_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unnamed".to_string())
    }
}

#[async_trait]
impl ProjectService for DefaultProjectService {
    async fn init(&self, name: Option<&str>, force: bool) -> Result<ProjectInfo, ProjectError> {
        if self.is_initialized() && !force {
            return Err(ProjectError::AlreadyExists(self.root.clone()));
        }

        tokio::fs::create_dir_all(self.codenav_dir()).await?;

        let languages = self.detect_languages();
        let project_name = name
            .map(|n| n.to_string())
            .unwrap_or_else(|| self.default_name());

        let config = CodenavConfig {
            project: ProjectConfig {
                name: Some(project_name.clone()),
                languages: languages.clone(),
                ..Default::default()
            },
            ..Default::default()
        };

        let content = toml::to_string_pretty(&config)
            .map_err(|e| ProjectError::Io(std::io::Error::other(e)))?;
        tokio::fs::write(self.config_path(), content).await?;
        tracing::info!("Initialized project {} at {}", project_name, self.root.display());

        Ok(ProjectInfo {
            name: project_name,
            root: self.root.clone(),
            languages,
            config_path: self.config_path(),
        })
    }

    async fn status(&self) -> Result<ProjectStatus, ProjectError> {
        if !self.is_initialized() {
            return Ok(ProjectStatus {
                initialized: false,
                project: None,
            });
        }

        let config_content = tokio::fs::read_to_string(self.config_path()).await?;
        let config: CodenavConfig = toml::from_str(&config_content)
            .map_err(|e| ProjectError::Io(std::io::Error::other(e)))?;

        let name = config
            .project
            .name
            .unwrap_or_else(|| self.default_name());

        let languages = if config.project.languages.is_empty() {
            self.detect_languages()
        } else {
            config.project.languages
        };

        Ok(ProjectStatus {
            initialized: true,
            project: Some(ProjectInfo {
                name,
                root: self.root.clone(),
                languages,
                config_path: self.config_path(),
            }),
        })
    }

    fn is_initialized(&self) -> bool {
        self.config_path().exists()
    }

    fn detect_languages(&self) -> Vec<Language> {
        let mut languages = BTreeSet::new();

        let walker = walkdir::WalkDir::new(&self.root)
            .max_depth(5)
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                e.depth() == 0
                    || !(name.starts_with('.') || DEFAULT_IGNORED_DIRS.contains(&&*name))
            });

        for entry in walker.filter_map(|e| e.ok()) {
            if entry.file_type().is_file() {
                let lang = Language::from_path(entry.path());
                if lang != Language::Unknown {
                    languages.insert(lang.id());
                }
            }
        }

        languages
            .into_iter()
            .filter_map(|id| id.parse().ok())
            .collect()
    }
}
