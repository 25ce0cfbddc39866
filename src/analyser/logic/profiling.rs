//! Statistic groups computed over a (filtered) trip dataset.
//!
//! Each `summarize_*` function is independent of the others: it reads the
//! dataset, never mutates it, and returns a fresh value. Any of them can run
//! in any order or on another thread.
//!
//! "Most frequent" is resolved the same way everywhere: the highest count
//! wins and ties go to the smallest value. Results therefore never depend on
//! the row order of the source file.
//!
//! An empty dataset has no meaningful aggregates, so every function returns
//! [`BikeshareError::NoData`] for it instead of a placeholder value.

use super::types::{
    BirthYearStats, Dataset, DurationStats, Popular, PopularTrip, StationStats, TimeStats,
    TripRecord, UserStats, ValueCount, month_name, weekday_from_number, weekday_name,
};
use crate::error::{BikeshareError, Result};
use std::collections::{BTreeMap, HashMap};

/// Most frequent value, ties going to the smallest. `None` for no values.
pub fn mode<T, I>(values: I) -> Option<Popular<T>>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    // Ascending key order plus a strict comparison keeps the smallest of any tie.
    let mut best: Option<Popular<T>> = None;
    for (value, count) in counts {
        if best.as_ref().is_none_or(|b| count > b.count) {
            best = Some(Popular { value, count });
        }
    }
    best
}

/// Distinct values with their counts, most frequent first, ties in first-seen order.
pub fn ranked_counts<'a, I>(values: I) -> Vec<ValueCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<ValueCount> = Vec::new();

    for value in values {
        if let Some(entry) = positions.get(value).and_then(|&i| counts.get_mut(i)) {
            entry.count += 1;
        } else {
            positions.insert(value, counts.len());
            counts.push(ValueCount {
                value: value.to_owned(),
                count: 1,
            });
        }
    }

    // `sort_by` is stable, so equal counts keep first-seen order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

fn non_empty<'a>(dataset: &'a Dataset, what: &'static str) -> Result<Vec<&'a TripRecord>> {
    if dataset.is_empty() {
        return Err(BikeshareError::NoData(what));
    }
    Ok(dataset.iter().collect())
}

fn required<T>(value: Option<T>, what: &'static str) -> Result<T> {
    value.ok_or(BikeshareError::NoData(what))
}

/// Busiest month, weekday and start hour.
///
/// # Errors
///
/// [`BikeshareError::NoData`] for an empty dataset.
pub fn summarize_time(dataset: &Dataset) -> Result<TimeStats> {
    const WHAT: &str = "time of travel";
    let records = non_empty(dataset, WHAT)?;

    let popular_month = required(mode(records.iter().map(|r| r.month())), WHAT)?;
    // Ranked by ISO number so a tie goes to the earlier weekday, not the earlier name.
    let popular_day = required(mode(records.iter().map(|r| r.day_of_week())), WHAT)?;
    let popular_day_name = required(
        weekday_from_number(popular_day.value).map(|day| popular_day.map(|_| weekday_name(day))),
        WHAT,
    )?;
    let popular_hour = required(mode(records.iter().map(|r| r.hour())), WHAT)?;

    Ok(TimeStats {
        popular_month_name: month_name(popular_month.value),
        popular_month,
        popular_day_name,
        popular_hour,
    })
}

/// Busiest start station, end station and start/end combination.
///
/// # Errors
///
/// [`BikeshareError::NoData`] for an empty dataset.
pub fn summarize_stations(dataset: &Dataset) -> Result<StationStats> {
    const WHAT: &str = "station";
    let records = non_empty(dataset, WHAT)?;

    let popular_start = required(mode(records.iter().map(|r| r.start_station.as_str())), WHAT)?;
    let popular_end = required(mode(records.iter().map(|r| r.end_station.as_str())), WHAT)?;
    let trip = required(
        mode(
            records
                .iter()
                .map(|r| (r.start_station.as_str(), r.end_station.as_str())),
        ),
        WHAT,
    )?;

    Ok(StationStats {
        popular_start: popular_start.map(str::to_owned),
        popular_end: popular_end.map(str::to_owned),
        popular_trip: PopularTrip {
            start: trip.value.0.to_owned(),
            end: trip.value.1.to_owned(),
            count: trip.count,
        },
    })
}

/// Total and mean trip duration in seconds.
///
/// # Errors
///
/// [`BikeshareError::NoData`] for an empty dataset.
pub fn summarize_duration(dataset: &Dataset) -> Result<DurationStats> {
    let records = non_empty(dataset, "trip duration")?;

    let total_seconds: f64 = records.iter().map(|r| r.trip_duration).sum();
    let trip_count = records.len();

    Ok(DurationStats {
        total_seconds,
        mean_seconds: total_seconds / trip_count as f64,
        trip_count,
    })
}

/// Rider type breakdown plus, where the city records them, gender and birth year.
///
/// `birth_year_stats` is `None` when the city has no `Birth Year` column or
/// when every selected trip left it blank; the other counts are still returned.
///
/// # Errors
///
/// [`BikeshareError::NoData`] for an empty dataset.
pub fn summarize_users(dataset: &Dataset) -> Result<UserStats> {
    let records = non_empty(dataset, "user")?;
    let fields = dataset.fields();

    let user_type_counts = ranked_counts(
        records
            .iter()
            .map(|r| r.user_type.as_str())
            .filter(|t| !t.is_empty()),
    );

    let gender_counts = fields
        .gender
        .then(|| ranked_counts(records.iter().filter_map(|r| r.gender.as_deref())));

    let birth_year_stats = if fields.birth_year {
        let years: Vec<i32> = records.iter().filter_map(|r| r.birth_year).collect();
        birth_year_stats(&years)
    } else {
        None
    };

    Ok(UserStats {
        user_type_counts,
        gender_counts,
        birth_year_stats,
    })
}

fn birth_year_stats(years: &[i32]) -> Option<BirthYearStats> {
    Some(BirthYearStats {
        earliest: years.iter().min().copied()?,
        most_recent: years.iter().max().copied()?,
        most_common: mode(years.iter().copied())?,
    })
}
