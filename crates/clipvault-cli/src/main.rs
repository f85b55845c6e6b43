use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod app;
mod commands;
mod view;

#[derive(Parser)]
#[command(name = "clipvault")]
#[command(about = "Clipvault - search your clipboard history", long_about = None)]
struct Cli {
    /// Directory holding config.toml and logs (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one search and print the results as they stream in
    Search(commands::search::SearchArgs),
    /// List the labels known to the backend
    Labels,
    /// Read query edits from stdin and keep the results up to date
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let app = app::App::bootstrap(cli.config)?;

    match cli.command {
        Commands::Search(args) => commands::search::run(&app, args).await?,
        Commands::Labels => commands::labels::run(&app).await?,
        Commands::Interactive => commands::interactive::run(&app).await?,
    }

    Ok(())
}
