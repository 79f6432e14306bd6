//! Init command implementation
//!
//! Create `.codenav/config.toml` with the detected languages.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::app::App;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project name (defaults to the directory name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Force re-initialization
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Serialize)]
struct InitResponse {
    status: &'static str,
    name: String,
    path: String,
    config_path: String,
    languages: Vec<String>,
}

pub async fn execute(args: InitArgs, app: &App) -> Result<()> {
    let ctx = &app.output;

    match app.project.init(args.name.as_deref(), args.force).await {
        Ok(info) => {
            let response = InitResponse {
                status: "initialized",
                name: info.name,
                path: info.root.display().to_string(),
                config_path: ctx.relative_path(&info.config_path),
                languages: info.languages.iter().map(|l| l.to_string()).collect(),
            };
            ctx.print_success_flat(response);
        }
        Err(e) => ctx.print_error(&e.to_string()),
    }

    Ok(())
}
