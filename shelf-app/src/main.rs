use anyhow::Result;
use clap::{Parser, Subcommand};
use shelf_common::observability::init_logging;
use shelf_config::{ShelfConfig, ShelfConfigLoader};
use std::path::PathBuf;
mod wiring;

/// Save-for-later article extraction and rendering.
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
struct Cli {
    /// YAML configuration file; absent files fall back to defaults.
    #[arg(long, env = "SHELF_CONFIG", default_value = "shelf.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch a URL and print the extracted article record as JSON.
    Extract { url: String },
    /// Read a saved article record (JSON) and print how its content displays.
    Render { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let cfg: ShelfConfig = ShelfConfigLoader::new()
        .with_optional_file(&cli.config)
        .load()?;

    // 2) Logging from the `logging` section
    let log_path = init_logging(wiring::log_config(&cfg.logging)?)?;
    tracing::debug!(log_path = %log_path.display(), "app.logging.ready");

    let output = match cli.command {
        Command::Extract { url } => wiring::run_extract(&cfg, &url).await?,
        Command::Render { path } => wiring::run_render(&path)?,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
