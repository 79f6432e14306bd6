//! Search command implementation
//!
//! Provides two fuzzy search modes:
//! - `symbols`: subsequence match over indexed symbol names
//! - `files`: quick-open over project file paths

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;

use crate::app::App;
use crate::services::workspace::{scan_files, search_files};

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[command(subcommand)]
    pub command: SearchCommand,
}

#[derive(Subcommand, Debug)]
pub enum SearchCommand {
    /// Fuzzy search over symbol names
    Symbols {
        /// Characters to match in order, case-insensitive
        pattern: String,

        /// Maximum results (default from config: search.symbol_limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Fuzzy search over file paths (quick-open)
    Files {
        /// Characters to match in order; empty lists the first files
        #[arg(default_value = "")]
        pattern: String,

        /// Maximum results (default from config: search.file_limit)
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Serialize)]
struct SymbolSearchResponse {
    pattern: String,
    count: usize,
    symbols: Vec<Value>,
}

#[derive(Serialize)]
struct FileMatch {
    score: u32,
    path: String,
}

#[derive(Serialize)]
struct FileSearchResponse {
    pattern: String,
    scanned: usize,
    count: usize,
    files: Vec<FileMatch>,
}

pub async fn execute(args: SearchArgs, app: &App) -> Result<()> {
    let ctx = &app.output;
    let cfg = &app.config().search;

    match args.command {
        SearchCommand::Symbols { pattern, limit } => {
            let index = app.open_index().await?;
            let symbols: Vec<Value> = index
                .fuzzy_search(&pattern, limit.unwrap_or(cfg.symbol_limit))
                .iter()
                .map(|s| ctx.symbol(s))
                .collect();

            ctx.print_success_flat(SymbolSearchResponse {
                pattern,
                count: symbols.len(),
                symbols,
            });
        }

        SearchCommand::Files { pattern, limit } => {
            let root = app.root().to_path_buf();
            let files = tokio::task::spawn_blocking(move || scan_files(&[root])).await?;

            let matches: Vec<FileMatch> = search_files(&files, &pattern, limit.unwrap_or(cfg.file_limit))
                .into_iter()
                .map(|(score, file)| FileMatch {
                    score,
                    path: file.relative.clone(),
                })
                .collect();

            ctx.print_success_flat(FileSearchResponse {
                pattern,
                scanned: files.len(),
                count: matches.len(),
                files: matches,
            });
        }
    }

    Ok(())
}
