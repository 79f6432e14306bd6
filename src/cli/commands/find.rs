//! Find command implementation
//!
//! Exact lookups against the symbol index: by name, qualified name or file,
//! definition under a cursor, and whole-word references.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;

use crate::app::App;
use crate::cli::ParsedLocation;
use crate::infra::source::SourceProvider;
use crate::models::symbol::{Location, SymbolKind};
use crate::services::navigation::{EditorHost, NavigationOutcome, NavigationService};
use crate::services::references::ReferenceFinder;

#[derive(Args, Debug)]
pub struct FindArgs {
    #[command(subcommand)]
    pub command: FindCommand,
}

#[derive(Subcommand, Debug)]
pub enum FindCommand {
    /// Find symbols by exact name
    Symbol {
        name: String,

        /// Only symbols of this kind (class, function, method, ...)
        #[arg(short, long)]
        kind: Option<SymbolKind>,
    },

    /// Find a symbol by qualified name (e.g. "User.save")
    Qualified { qualified_name: String },

    /// List the symbols of one file
    File { file: PathBuf },

    /// Go to definition of the symbol at a position
    Def {
        /// File path with position (file:line[:column], 1-indexed)
        location: String,
    },

    /// Find whole-word references to a name
    Refs {
        /// Symbol name
        #[arg(required_unless_present = "at")]
        name: Option<String>,

        /// Take the name from a position instead (file:line[:column])
        #[arg(long, conflicts_with = "name")]
        at: Option<String>,

        /// Restrict the search to these files (defaults to every indexed file)
        #[arg(long = "in")]
        files: Vec<PathBuf>,

        /// Maximum results (default from config: search.refs_limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Count whole-word references to a name across indexed files
    Count { name: String },
}

#[derive(Serialize)]
struct SymbolsResponse {
    query: String,
    count: usize,
    symbols: Vec<Value>,
}

#[derive(Serialize)]
struct DefinitionResponse {
    symbol: String,
    location: String,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    definition: Option<Value>,
}

#[derive(Serialize)]
struct ReferencesResponse {
    symbol: String,
    total: usize,
    truncated: bool,
    references: Vec<Value>,
}

#[derive(Serialize)]
struct CountResponse {
    symbol: String,
    count: usize,
}

/// Editor stand-in for one CLI invocation: the cursor comes from the
/// command line and the revealed location is captured
struct CommandLineEditor<'a> {
    source: &'a dyn SourceProvider,
    cursor: Location,
    revealed: Option<Location>,
}

impl EditorHost for CommandLineEditor<'_> {
    fn file_content(&self, path: &Path) -> Option<String> {
        self.source.read(path).ok()
    }

    fn cursor(&self) -> Option<Location> {
        Some(self.cursor.clone())
    }

    fn reveal(&mut self, location: &Location) {
        self.revealed = Some(location.clone());
    }
}

/// Parse a location, confine it to the project and check it against the file
fn resolve_location(input: &str, app: &App) -> Result<ParsedLocation> {
    let location = ParsedLocation::parse(input)?.resolve(app.root())?;
    let content = app.source().read(&location.file)?;
    location.validate_position_with_content(&content)?;
    Ok(location)
}

pub async fn execute(args: FindArgs, app: &App) -> Result<()> {
    let ctx = &app.output;
    let index = app.open_index().await?;

    match args.command {
        FindCommand::Symbol { name, kind } => {
            let symbols: Vec<Value> = index
                .find_symbol(&name)
                .iter()
                .filter(|s| kind.is_none_or(|k| s.kind == k))
                .map(|s| ctx.symbol(s))
                .collect();
            ctx.print_success_flat(SymbolsResponse {
                query: name,
                count: symbols.len(),
                symbols,
            });
        }

        FindCommand::Qualified { qualified_name } => {
            let symbols: Vec<Value> = index
                .find_by_qualified_name(&qualified_name)
                .map(|s| ctx.symbol(s))
                .into_iter()
                .collect();
            ctx.print_success_flat(SymbolsResponse {
                query: qualified_name,
                count: symbols.len(),
                symbols,
            });
        }

        FindCommand::File { file } => {
            let path = app.root().join(&file);
            let path = path.canonicalize().unwrap_or(path);
            let symbols: Vec<Value> = index
                .get_file_symbols(&path)
                .iter()
                .map(|s| ctx.symbol(s))
                .collect();
            ctx.print_success_flat(SymbolsResponse {
                query: ctx.relative_path(&path),
                count: symbols.len(),
                symbols,
            });
        }

        FindCommand::Def { location } => {
            let location = resolve_location(&location, app)?;
            let mut editor = CommandLineEditor {
                source: app.source(),
                cursor: location.cursor(),
                revealed: None,
            };

            let navigation = NavigationService::new(&index);
            let shown = format!(
                "{}:{}:{}",
                ctx.relative_path(&location.file),
                location.line,
                location.column
            );

            match navigation.jump_to_definition(&mut editor) {
                NavigationOutcome::Revealed(record) => {
                    tracing::debug!("Revealed {:?}", editor.revealed);
                    ctx.print_success_flat(DefinitionResponse {
                        symbol: record.name.clone(),
                        location: shown,
                        found: true,
                        definition: Some(ctx.symbol(&record)),
                    });
                }
                NavigationOutcome::NotFound(name) => {
                    ctx.print_success_flat(DefinitionResponse {
                        symbol: name,
                        location: shown,
                        found: false,
                        definition: None,
                    });
                }
                NavigationOutcome::NoSymbolAtCursor => {
                    ctx.print_error(&format!("No symbol at {shown}"));
                }
            }
        }

        FindCommand::Refs {
            name,
            at,
            files,
            limit,
        } => {
            let limit = limit.unwrap_or(app.config().search.refs_limit);

            let name = match (name, at) {
                (Some(name), _) => name,
                (None, Some(at)) => {
                    let location = resolve_location(&at, app)?;
                    let content = app.source().read(&location.file)?;
                    let cursor = location.cursor();
                    match NavigationService::symbol_at_position(&content, cursor.line, cursor.column)
                    {
                        Some(name) => name,
                        None => {
                            ctx.print_error(&format!("No symbol at {at}"));
                            return Ok(());
                        }
                    }
                }
                (None, None) => bail!("Provide a symbol name or --at <file:line:column>"),
            };

            let files: Vec<PathBuf> = files.iter().map(|f| app.root().join(f)).collect();
            let finder = ReferenceFinder::new(&index, app.source());
            let references = finder.find_all_references(&name, Some(files.as_slice()));

            let total = references.len();
            ctx.print_success_flat(ReferencesResponse {
                symbol: name,
                total,
                truncated: total > limit,
                references: references
                    .iter()
                    .take(limit)
                    .map(|r| ctx.reference(r))
                    .collect(),
            });
        }

        FindCommand::Count { name } => {
            let count = ReferenceFinder::new(&index, app.source()).count_references(&name);
            ctx.print_success_flat(CountResponse {
                symbol: name,
                count,
            });
        }
    }

    Ok(())
}
