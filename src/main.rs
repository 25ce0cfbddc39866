//! # bikeshare command-line entry point
//!
//! ```text
//! main()
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   ├─> Load config (--config or platform default), apply --data-dir / BIKESHARE_DATA_DIR
//!   ├─> Initialize logging (console on stderr, optional rolling files)
//!   └─> Run the subcommand, `explore` when none is given
//! ```

#![warn(clippy::all, rust_2018_idioms)]

mod cli;

use anyhow::{Context as _, Result};
use bikeshare::config::{get_config_path, load_app_config};
use bikeshare::logging;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli::Cli {
        config: config_arg,
        data_dir,
        command,
    } = cli::Cli::parse();

    let config_path = match config_arg {
        Some(path) => path,
        None => get_config_path()?,
    };
    let mut config = load_app_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }

    if let Err(err) = logging::init(config.log_to_file) {
        // Fall back to console-only logging rather than refusing to start.
        if logging::init(false).is_ok() {
            tracing::warn!("File logging unavailable: {err:#}");
        }
    }
    tracing::debug!(config = %config_path.display(), data_dir = %config.data_dir.display(), "Starting");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    cli::run_command(
        command.unwrap_or(cli::Commands::Explore),
        &config,
        &config_path,
        stdin.lock(),
        &mut stdout,
    )
}
