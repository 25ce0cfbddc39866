use anyhow::{Context as _, Result};
use bikeshare::analyser::logic::{FilterSpec, RawDataPager, filter, load_city, run_statistics};
use bikeshare::config::{AppConfig, DATA_DIR_ENV, save_app_config};
use bikeshare::prompt::{Session, parse_city, parse_month};
use bikeshare::report::{render_page, render_report};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bikeshare", version, about = "Explore US bike-share trip data")]
pub struct Cli {
    /// Path to the JSON config file. Defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the city CSV files. Overrides the config file.
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive session on stdin/stdout (the default)
    Explore,
    /// Print statistics for one city and exit
    Stats {
        /// City to analyse, e.g. "chicago" or "new york city"
        #[arg(short, long)]
        city: String,

        /// Only trips starting in this month (January to June)
        #[arg(short, long)]
        month: Option<String>,

        /// Only trips starting on this weekday (1=Monday ... 7=Sunday)
        #[arg(short, long)]
        day: Option<u32>,

        /// Also print this many pages of raw trips
        #[arg(long, default_value_t = 0, conflicts_with = "json")]
        raw_pages: usize,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List configured cities and whether their data files exist
    Cities,
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write the default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

pub fn run_command(
    command: Commands,
    config: &AppConfig,
    config_path: &Path,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Commands::Explore => {
            Session::new(input, &mut *out, config).run()?;
            Ok(())
        }
        Commands::Stats {
            city,
            month,
            day,
            raw_pages,
            json,
        } => handle_stats(config, &city, month.as_deref(), day, raw_pages, json, out),
        Commands::Cities => handle_cities(config, out),
        Commands::Config { action } => handle_config(action, config, config_path, out),
    }
}

fn handle_stats(
    config: &AppConfig,
    city: &str,
    month: Option<&str>,
    day: Option<u32>,
    raw_pages: usize,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let city = parse_city(city, config)?;
    let month = month.map(parse_month).transpose()?;
    let spec = FilterSpec::new(month, day)?;

    let dataset = load_city(config, city)?;
    let filtered = filter(&dataset, &spec);
    let report = run_statistics(city, spec, &filtered);

    if json {
        serde_json::to_writer_pretty(&mut *out, &report).context("Failed to write JSON report")?;
        writeln!(out)?;
        return Ok(());
    }

    write!(out, "{}", render_report(&report))?;

    let mut pager = RawDataPager::new(&filtered);
    for _ in 0..raw_pages {
        let page = pager.next_page()?;
        if page.is_empty() {
            break;
        }
        write!(out, "\n{}", render_page(page, filtered.fields()))?;
    }
    Ok(())
}

fn handle_cities(config: &AppConfig, out: &mut impl Write) -> Result<()> {
    for city in config.city_names() {
        let path = config.city_path(city)?;
        let status = if path.is_file() { "found" } else { "missing" };
        writeln!(out, "{city}: {} ({status})", path.display())?;
    }
    Ok(())
}

fn handle_config(
    action: ConfigAction,
    config: &AppConfig,
    config_path: &Path,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        ConfigAction::Init { force } => {
            if config_path.exists() && !force {
                anyhow::bail!(
                    "{} already exists, pass --force to overwrite it",
                    config_path.display()
                );
            }
            save_app_config(&AppConfig::default(), config_path)?;
            tracing::info!(path = %config_path.display(), "Wrote default config");
            writeln!(out, "Wrote default config to {}", config_path.display())?;
        }
        ConfigAction::Show => {
            writeln!(out, "{}", serde_json::to_string_pretty(config)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_stats_args() -> Result<()> {
        let cli = Cli::try_parse_from([
            "bikeshare", "stats", "--city", "chicago", "--month", "march", "--day", "2",
        ])?;
        let Some(Commands::Stats {
            city, month, day, ..
        }) = cli.command
        else {
            anyhow::bail!("expected the stats command");
        };
        assert_eq!(city, "chicago");
        assert_eq!(month.as_deref(), Some("march"));
        assert_eq!(day, Some(2));
        Ok(())
    }

    #[test]
    fn test_raw_pages_conflicts_with_json() {
        let parsed = Cli::try_parse_from([
            "bikeshare", "stats", "--city", "chicago", "--raw-pages", "2", "--json",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_config_init_refuses_to_overwrite() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        let config = AppConfig::default();
        let mut out = Vec::new();

        let init = |force| Commands::Config {
            action: ConfigAction::Init { force },
        };
        run_command(init(false), &config, &path, std::io::empty(), &mut out)?;
        assert!(path.is_file());
        assert!(run_command(init(false), &config, &path, std::io::empty(), &mut out).is_err());
        run_command(init(true), &config, &path, std::io::empty(), &mut out)?;
        Ok(())
    }

    #[test]
    fn test_cities_reports_missing_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("chicago.csv"), "")?;
        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };

        let mut out = Vec::new();
        run_command(Commands::Cities, &config, dir.path(), std::io::empty(), &mut out)?;
        let text = String::from_utf8(out)?;
        assert!(text.contains("chicago.csv (found)"));
        assert!(text.contains("washington.csv (missing)"));
        Ok(())
    }

    #[test]
    fn test_stats_rejects_bad_filter() {
        let config = AppConfig::default();
        let command = Commands::Stats {
            city: "chicago".to_owned(),
            month: None,
            day: Some(8),
            raw_pages: 0,
            json: false,
        };
        let result = run_command(command, &config, Path::new("unused"), std::io::empty(), &mut Vec::new());
        assert!(result.is_err());
    }
}
