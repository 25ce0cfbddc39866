use super::io::read_raw_table;
use super::loader::load;
use super::profiling::{summarize_duration, summarize_stations, summarize_time, summarize_users};
use super::types::{Dataset, FilterSpec, Section, SectionOutcome, TripReport};
use crate::config::AppConfig;
use crate::error::{Result, ResultExt as _};
use std::time::Instant;

/// Reads and parses the configured data file for `city`.
///
/// # Errors
///
/// Unknown city, unreadable file, or any row that fails to load.
pub fn load_city(config: &AppConfig, city: &str) -> Result<Dataset> {
    let path = config.city_path(city)?;
    let start = Instant::now();

    let table = read_raw_table(&path)?;
    let dataset = load(&table)
        .with_context(|| format!("Failed to load {city} data from {}", path.display()))?;

    tracing::info!(
        city,
        rows = dataset.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "City dataset ready"
    );
    Ok(dataset)
}

fn timed<T>(name: &str, f: impl FnOnce() -> Result<T>) -> Section<T> {
    let start = Instant::now();
    let outcome = match f() {
        Ok(value) => SectionOutcome::Ready(value),
        Err(err) => {
            tracing::debug!(section = name, "{err}");
            SectionOutcome::Unavailable(err.to_string())
        }
    };
    let elapsed = start.elapsed();
    tracing::debug!(section = name, elapsed_us = elapsed.as_micros(), "Statistic computed");
    Section { outcome, elapsed }
}

/// Runs all four statistic groups over an already filtered dataset.
///
/// A group with nothing to report is recorded as unavailable; the others still run.
pub fn run_statistics(city: &str, filter: FilterSpec, dataset: &Dataset) -> TripReport {
    TripReport {
        city: city.to_owned(),
        filter,
        fields: dataset.fields(),
        trip_count: dataset.len(),
        time: timed("time", || summarize_time(dataset)),
        stations: timed("stations", || summarize_stations(dataset)),
        duration: timed("duration", || summarize_duration(dataset)),
        users: timed("users", || summarize_users(dataset)),
    }
}
