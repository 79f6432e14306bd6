//! Application container for Codenav

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::OutputContext;
use crate::infra::source::{FsSource, SourceProvider};
use crate::models::config::CodenavConfig;
use crate::services::config::{ConfigService, DefaultConfigService};
use crate::services::index::SymbolIndex;
use crate::services::project::{DefaultProjectService, ProjectService};
use crate::services::workspace::{IndexReport, WorkspaceIndexer};

pub struct App {
    root: PathBuf,
    pub(crate) output: OutputContext,
    pub(crate) project: Arc<dyn ProjectService>,
    pub(crate) config_service: Arc<dyn ConfigService>,
    pub(crate) config: CodenavConfig,
    source: Arc<dyn SourceProvider>,
}

impl App {
    pub async fn new() -> anyhow::Result<Self> {
        let root = std::env::current_dir()?;
        Self::at(root).await
    }

    pub async fn at(root: PathBuf) -> anyhow::Result<Self> {
        // Indexed paths and cursor files must share one spelling of the root
        let root = root.canonicalize().unwrap_or(root);
        tracing::debug!("Initializing Codenav at {:?}", root);

        let output = OutputContext::new(root.clone());
        let config_service = Arc::new(DefaultConfigService::new(&root));
        let config = match config_service.load(false).await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default config: {}", e);
                CodenavConfig::default()
            }
        };

        let project = Arc::new(DefaultProjectService::new(&root));

        Ok(Self {
            root,
            output,
            project,
            config_service,
            config,
            source: Arc::new(FsSource),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &CodenavConfig {
        &self.config
    }

    pub fn source(&self) -> &dyn SourceProvider {
        self.source.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.project.is_initialized()
    }

    pub fn cache_path(&self) -> PathBuf {
        self.root.join(".codenav").join(&self.config.index.cache_file)
    }

    pub fn workspace_indexer(&self) -> WorkspaceIndexer {
        WorkspaceIndexer::new(&self.config, Arc::clone(&self.source))
    }

    /// Index loaded from the cache only
    pub fn cached_index(&self) -> SymbolIndex {
        SymbolIndex::with_cache(self.cache_path())
    }

    /// Index from the cache, built from the project root when the cache is empty
    pub async fn open_index(&self) -> anyhow::Result<SymbolIndex> {
        let index = self.cached_index();
        if !index.is_empty() {
            return Ok(index);
        }

        tracing::info!("No cached index, indexing {}", self.root.display());
        let (index, _) = self.build_index(index, vec![self.root.clone()]).await?;
        Ok(index)
    }

    /// Index `roots` off the async runtime, saving the cache when configured
    pub async fn build_index(
        &self,
        mut index: SymbolIndex,
        roots: Vec<PathBuf>,
    ) -> anyhow::Result<(SymbolIndex, IndexReport)> {
        let workspace = self.workspace_indexer();
        let auto_save = self.config.index.auto_save;

        let result = tokio::task::spawn_blocking(move || {
            let report = workspace.index_roots(&mut index, &roots);
            if auto_save && let Err(e) = index.save_to_cache() {
                tracing::warn!("Failed to save symbol cache: {}", e);
            }
            (index, report)
        })
        .await?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_index_builds_and_caches() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("shapes.py"),
            "class Circle:\n    def area(self):\n        return 0\n",
        )
        .unwrap();

        let app = App::at(temp.path().to_path_buf()).await.unwrap();
        let index = app.open_index().await.unwrap();
        assert_eq!(index.find_symbol("area").len(), 1);
        assert!(app.cache_path().exists());

        let cached = app.cached_index();
        assert_eq!(cached.get_statistics(), index.get_statistics());
    }
}
