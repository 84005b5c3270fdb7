use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tick_snake::{app, GameConfig};

#[derive(Parser)]
#[command(name = "tick-snake")]
#[command(version, about = "Snake in the terminal, one cell per tick")]
struct Cli {
    /// YAML file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board width and height in pixels
    #[arg(long)]
    canvas_size: Option<u32>,

    /// Cell width and height in pixels
    #[arg(long)]
    cell_size: Option<u32>,

    /// Milliseconds between moves
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (level from RUST_LOG, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log lines on the terminal would tear up the board, so only to a file.
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = load_config(&cli)?;
    config.validate().context("Invalid game settings")?;
    info!(
        canvas_size = config.canvas_size,
        cell_size = config.cell_size,
        tick_interval_ms = config.tick_interval_ms,
        seed = ?config.seed,
        "Configuration loaded"
    );

    app::run(&config).await
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_file(path)
            .with_context(|| format!("Error loading {}", path.display()))?,
        None => GameConfig::default(),
    };

    if let Some(canvas_size) = cli.canvas_size {
        config.canvas_size = canvas_size;
    }
    if let Some(cell_size) = cli.cell_size {
        config.cell_size = cell_size;
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_interval_ms = tick_ms;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    Ok(config)
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Error creating log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(())
}
