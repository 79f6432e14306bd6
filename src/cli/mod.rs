//! CLI module for Codenav
//!
//! Provides command-line interface using clap derive macros.

pub mod commands;
pub mod location;
pub mod output;

pub use location::ParsedLocation;
pub use output::OutputContext;

use clap::{Parser, Subcommand};

use commands::{
    config::ConfigArgs, find::FindArgs, index::IndexArgs, init::InitArgs, search::SearchArgs,
    status::StatusArgs,
};

const LONG_ABOUT: &str = r#"
Codenav - Symbol index and navigation for source trees

Codenav parses Python deeply and twelve more languages by outline, keeps a
symbol index cached under .codenav/, and answers lookups as JSON.

QUICK START:
  1. Initialize a project:    codenav init
  2. Build the index:         codenav index
  3. Find a symbol:           codenav find symbol User
  4. Go to definition:        codenav find def app/views.py:12:9

SEARCH EXAMPLES:
  codenav search symbols usrsv                # Fuzzy symbol names
  codenav search files modpy                  # Quick-open file paths
  codenav find refs save --in app/models.py   # Whole-word references
  codenav find count User                     # Reference count
"#;

/// Codenav - Symbol index and navigation for source trees
#[derive(Parser, Debug)]
#[command(name = "codenav")]
#[command(author, version, about, long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
#[command(after_help = "Use 'codenav <COMMAND> --help' for more information about a command.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new Codenav project
    Init(InitArgs),

    /// Build or refresh the symbol index
    Index(IndexArgs),

    /// Show project and index status
    Status(StatusArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Find symbols, definitions, references
    Find(FindArgs),

    /// Fuzzy search over symbols or files
    Search(SearchArgs),
}
