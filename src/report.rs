//! Plain-text rendering of statistics and raw-data pages.
//!
//! Everything here builds `String`s; the caller decides where they go.

use crate::analyser::logic::types::{
    DurationStats, FieldSet, Section, SectionOutcome, StationStats, TimeStats, TripRecord,
    TripReport, UserStats, ValueCount,
};
use std::fmt::{self, Write as _};
use std::sync::Arc;

/// Separator printed after every section.
pub const RULE: &str = "----------------------------------------";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn render_report(report: &TripReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, report);
    out
}

/// # Errors
///
/// Only if `out` itself fails.
pub fn write_report(out: &mut impl fmt::Write, report: &TripReport) -> fmt::Result {
    writeln!(
        out,
        "Showing {} for {} ({} trips)",
        report.filter.describe(),
        title_case(&report.city),
        report.trip_count
    )?;
    writeln!(out, "{RULE}")?;

    write_section(
        out,
        "Calculating The Most Frequent Times of Travel...",
        &report.time,
        write_time,
    )?;
    write_section(
        out,
        "Calculating The Most Popular Stations and Trip...",
        &report.stations,
        write_stations,
    )?;
    write_section(out, "Calculating Trip Duration...", &report.duration, write_duration)?;
    write_section(out, "Calculating User Stats...", &report.users, |out, users| {
        write_users(out, users, report.fields)
    })
}

fn write_section<W, T, F>(out: &mut W, title: &str, section: &Section<T>, body: F) -> fmt::Result
where
    W: fmt::Write,
    F: FnOnce(&mut W, &T) -> fmt::Result,
{
    writeln!(out, "\n{title}\n")?;
    match &section.outcome {
        SectionOutcome::Ready(value) => body(out, value)?,
        SectionOutcome::Unavailable(reason) => writeln!(out, "{reason}.")?,
    }
    writeln!(
        out,
        "\nThis took {:.6} seconds.",
        section.elapsed.as_secs_f64()
    )?;
    writeln!(out, "{RULE}")
}

fn write_time(out: &mut impl fmt::Write, time: &TimeStats) -> fmt::Result {
    match time.popular_month_name {
        Some(name) => writeln!(
            out,
            "Most common month: {name} ({} trips)",
            time.popular_month.count
        )?,
        None => writeln!(
            out,
            "Most common month: month {} ({} trips)",
            time.popular_month.value, time.popular_month.count
        )?,
    }
    writeln!(
        out,
        "Most common day of week: {} ({} trips)",
        time.popular_day_name.value, time.popular_day_name.count
    )?;
    writeln!(
        out,
        "Most common start hour: {:02}:00 ({} trips)",
        time.popular_hour.value, time.popular_hour.count
    )
}

fn write_stations(out: &mut impl fmt::Write, stations: &StationStats) -> fmt::Result {
    writeln!(
        out,
        "Most commonly used start station: {} ({} trips)",
        stations.popular_start.value, stations.popular_start.count
    )?;
    writeln!(
        out,
        "Most commonly used end station: {} ({} trips)",
        stations.popular_end.value, stations.popular_end.count
    )?;
    writeln!(
        out,
        "Most frequent trip: {} -> {} ({} trips)",
        stations.popular_trip.start, stations.popular_trip.end, stations.popular_trip.count
    )
}

fn write_duration(out: &mut impl fmt::Write, duration: &DurationStats) -> fmt::Result {
    writeln!(
        out,
        "Total travel time: {:.0} seconds ({})",
        duration.total_seconds,
        humanize_seconds(duration.total_seconds)
    )?;
    writeln!(
        out,
        "Mean travel time: {:.1} seconds ({})",
        duration.mean_seconds,
        humanize_seconds(duration.mean_seconds)
    )
}

fn write_users(out: &mut impl fmt::Write, users: &UserStats, fields: FieldSet) -> fmt::Result {
    writeln!(out, "Counts of user types:")?;
    write_counts(out, &users.user_type_counts)?;

    match &users.gender_counts {
        Some(counts) => {
            writeln!(out, "\nCounts of gender:")?;
            write_counts(out, counts)?;
        }
        None if !fields.gender => writeln!(out, "\nGender data is not available for this city.")?,
        None => {}
    }

    match &users.birth_year_stats {
        Some(years) => {
            writeln!(out, "\nEarliest year of birth: {}", years.earliest)?;
            writeln!(out, "Most recent year of birth: {}", years.most_recent)?;
            writeln!(
                out,
                "Most common year of birth: {} ({} riders)",
                years.most_common.value, years.most_common.count
            )?;
        }
        None if !fields.birth_year => {
            writeln!(out, "\nBirth year data is not available for this city.")?;
        }
        None => writeln!(out, "\nNo birth years were recorded for these trips.")?,
    }
    Ok(())
}

fn write_counts(out: &mut impl fmt::Write, counts: &[ValueCount]) -> fmt::Result {
    if counts.is_empty() {
        return writeln!(out, "  (no values recorded)");
    }
    for entry in counts {
        writeln!(out, "  {}: {}", entry.value, entry.count)?;
    }
    Ok(())
}

/// Renders a page of raw trips, one block per trip, showing only the columns the dataset has.
pub fn render_page(records: &[Arc<TripRecord>], fields: FieldSet) -> String {
    let mut out = String::new();
    for record in records {
        // Writing into a String cannot fail.
        let _ = write_record(&mut out, record, fields);
    }
    out
}

fn write_record(out: &mut String, record: &TripRecord, fields: FieldSet) -> fmt::Result {
    writeln!(out, "Start Time: {}", record.start_time.format(TIMESTAMP_FORMAT))?;
    writeln!(out, "End Time: {}", record.end_time.format(TIMESTAMP_FORMAT))?;
    writeln!(out, "Trip Duration: {}", record.trip_duration)?;
    writeln!(out, "Start Station: {}", record.start_station)?;
    writeln!(out, "End Station: {}", record.end_station)?;
    writeln!(out, "User Type: {}", or_dash(Some(record.user_type.as_str())))?;
    if fields.gender {
        writeln!(out, "Gender: {}", or_dash(record.gender.as_deref()))?;
    }
    if fields.birth_year {
        match record.birth_year {
            Some(year) => writeln!(out, "Birth Year: {year}")?,
            None => writeln!(out, "Birth Year: -")?,
        }
    }
    writeln!(out)
}

fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(text) if !text.is_empty() => text,
        _ => "-",
    }
}

/// `1234567.0` → `"14 days, 6 hours, 56 minutes, 7 seconds"`.
pub fn humanize_seconds(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return format!("{seconds} seconds");
    }
    // Sub-second precision is not interesting at this scale.
    let total = seconds.round() as u64;
    let parts = [
        (total / 86_400, "day"),
        (total % 86_400 / 3_600, "hour"),
        (total % 3_600 / 60, "minute"),
        (total % 60, "second"),
    ];

    let rendered: Vec<String> = parts
        .iter()
        .filter(|(amount, _)| *amount > 0)
        .map(|(amount, unit)| {
            if *amount == 1 {
                format!("{amount} {unit}")
            } else {
                format!("{amount} {unit}s")
            }
        })
        .collect();

    if rendered.is_empty() {
        "0 seconds".to_owned()
    } else {
        rendered.join(", ")
    }
}

pub(crate) fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
