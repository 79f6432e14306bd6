//! Status command implementation
//!
//! Show project status and what the symbol cache holds.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::app::App;
use crate::services::index::IndexStatistics;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Include the cache location
    #[arg(long)]
    pub detailed: bool,
}

#[derive(Serialize)]
struct StatusResponse {
    initialized: bool,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    project: Option<ProjectInfo>,
    index: IndexStatistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache: Option<CacheInfo>,
}

#[derive(Serialize)]
struct ProjectInfo {
    name: String,
    languages: Vec<String>,
}

#[derive(Serialize)]
struct CacheInfo {
    path: String,
    exists: bool,
}

pub async fn execute(args: StatusArgs, app: &App) -> Result<()> {
    let ctx = &app.output;
    let status = app.project.status().await?;

    let project = status.project.map(|p| ProjectInfo {
        name: p.name,
        languages: p.languages.iter().map(|l| l.to_string()).collect(),
    });

    // Status reports what is cached; it never triggers indexing
    let index = app.cached_index();
    let cache_path = app.cache_path();

    let response = StatusResponse {
        initialized: status.initialized,
        path: app.root().display().to_string(),
        project,
        index: index.get_statistics(),
        cache: args.detailed.then(|| CacheInfo {
            path: ctx.relative_path(&cache_path),
            exists: cache_path.exists(),
        }),
    };

    ctx.print_success_flat(response);
    Ok(())
}
