//! Index command implementation
//!
//! Build or refresh the symbol index and persist it to the cache.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::app::App;
use crate::services::index::IndexStatistics;
use crate::services::workspace::IndexReport;

#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Files or directories to (re)index (defaults to the project root)
    pub paths: Vec<PathBuf>,

    /// Drop the cached index before indexing
    #[arg(long)]
    pub clear: bool,
}

#[derive(Serialize)]
struct IndexResponse {
    #[serde(flatten)]
    report: IndexReport,
    statistics: IndexStatistics,
    cache_path: String,
    saved: bool,
}

pub async fn execute(args: IndexArgs, app: &App) -> Result<()> {
    let ctx = &app.output;

    let mut index = app.cached_index();
    if args.clear {
        index.clear();
    }

    let roots = if args.paths.is_empty() {
        vec![app.root().to_path_buf()]
    } else {
        args.paths.iter().map(|p| app.root().join(p)).collect()
    };

    let (index, report) = app.build_index(index, roots).await?;
    let cache_path = app.cache_path();

    ctx.print_success_flat(IndexResponse {
        report,
        statistics: index.get_statistics(),
        cache_path: ctx.relative_path(&cache_path),
        saved: app.config().index.auto_save && cache_path.exists(),
    });
    Ok(())
}
