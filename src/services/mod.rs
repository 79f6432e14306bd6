//! Service layer for Codenav

pub mod config;
pub mod index;
pub mod indexer;
pub mod navigation;
pub mod project;
pub mod references;
pub mod resolver;
pub mod workspace;

pub use config::{ConfigService, DefaultConfigService};
pub use index::{IndexStatistics, SymbolIndex};
pub use indexer::FileIndexer;
pub use navigation::{EditorHost, NavigationOutcome, NavigationService};
pub use project::{DefaultProjectService, ProjectService};
pub use references::ReferenceFinder;
pub use resolver::DefinitionResolver;
pub use workspace::{IndexReport, WorkspaceIndexer};
