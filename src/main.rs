//! Codenav - Symbol Index and Navigation CLI
//!
//! Every command prints one JSON document on stdout; logs go to stderr.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codenav::app::App;
use codenav::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // Quiet by default; RUST_LOG=codenav=debug or --verbose for more
    let default_filter = if cli.verbose {
        "codenav=debug"
    } else {
        "codenav=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!(
                r#"{{"success":false,"error":"Failed to create runtime: {}"}}"#,
                e
            );
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(async_main(cli)) {
        let response = serde_json::json!({
            "success": false,
            "error": format!("{e:#}")
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&response)
                .unwrap_or_else(|_| format!(r#"{{"success":false,"error":"{}"}}"#, e))
        );
        std::process::exit(2);
    }
}

async fn async_main(cli: Cli) -> anyhow::Result<()> {
    let app = App::new()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize: {}", e))?;

    execute_command(cli.command, &app).await
}

async fn execute_command(command: Commands, app: &App) -> anyhow::Result<()> {
    use codenav::cli::commands;

    match command {
        // Project management
        Commands::Init(args) => commands::init::execute(args, app).await,
        Commands::Status(args) => commands::status::execute(args, app).await,
        Commands::Config(args) => commands::config::execute(args, app).await,

        // Index and lookups
        Commands::Index(args) => commands::index::execute(args, app).await,
        Commands::Find(args) => commands::find::execute(args, app).await,
        Commands::Search(args) => commands::search::execute(args, app).await,
    }
}
