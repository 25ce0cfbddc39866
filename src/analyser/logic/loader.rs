//! Turns raw CSV rows into typed trip records.
//!
//! Loading is all-or-nothing: the first row with an unparseable timestamp,
//! duration or birth year aborts the load with a [`BikeshareError::Load`]
//! naming the row and column. Optional columns are detected once from the
//! header row and recorded in the dataset's [`FieldSet`].

use super::types::{
    BIRTH_YEAR, Dataset, END_STATION, END_TIME, FieldSet, GENDER, RawTable, START_STATION,
    START_TIME, TRIP_DURATION, TripRecord, USER_TYPE,
};
use crate::error::{BikeshareError, Result};
use chrono::NaiveDateTime;

/// Timestamp layouts found in the city exports, most common first.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

/// Birth years arrive as `1985` or, from exports that went through a float column, `1985.0`.
pub fn parse_birth_year(text: &str) -> Option<i32> {
    let text = text.trim();
    if let Ok(year) = text.parse::<i32>() {
        return Some(year);
    }
    let value = text.parse::<f64>().ok()?;
    if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return None;
    }
    // Integral and in range, so the cast is exact.
    Some(value as i32)
}

struct ColumnIndex {
    start_time: usize,
    end_time: usize,
    trip_duration: usize,
    start_station: usize,
    end_station: usize,
    user_type: usize,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl ColumnIndex {
    fn resolve(table: &RawTable) -> Result<Self> {
        let required = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| BikeshareError::load(format!("missing required column '{name}'")))
        };

        Ok(Self {
            start_time: required(START_TIME)?,
            end_time: required(END_TIME)?,
            trip_duration: required(TRIP_DURATION)?,
            start_station: required(START_STATION)?,
            end_station: required(END_STATION)?,
            user_type: required(USER_TYPE)?,
            gender: table.column_index(GENDER),
            birth_year: table.column_index(BIRTH_YEAR),
        })
    }

    fn fields(&self) -> FieldSet {
        FieldSet {
            gender: self.gender.is_some(),
            birth_year: self.birth_year.is_some(),
        }
    }

    fn parse_row(&self, row_no: usize, row: &[Option<String>]) -> Result<TripRecord> {
        let required = |index: usize, name: &str| {
            cell(row, index)
                .ok_or_else(|| BikeshareError::load_at(row_no, format!("missing value in '{name}'")))
        };
        let timestamp = |index: usize, name: &str| {
            let text = required(index, name)?;
            parse_timestamp(text).ok_or_else(|| {
                BikeshareError::load_at(row_no, format!("unparseable {name} '{text}'"))
            })
        };

        let start_time = timestamp(self.start_time, START_TIME)?;
        let end_time = timestamp(self.end_time, END_TIME)?;

        let duration_text = required(self.trip_duration, TRIP_DURATION)?;
        let trip_duration = duration_text.parse::<f64>().map_err(|e| {
            BikeshareError::load_at(row_no, format!("unparseable {TRIP_DURATION} '{duration_text}': {e}"))
        })?;

        // Some exports leave the rider type blank; those rows are kept and skipped by the counts.
        let user_type = cell(row, self.user_type).unwrap_or_default();

        let gender = self
            .gender
            .and_then(|index| cell(row, index))
            .map(str::to_owned);

        let birth_year = match self.birth_year.and_then(|index| cell(row, index)) {
            Some(text) => Some(parse_birth_year(text).ok_or_else(|| {
                BikeshareError::load_at(row_no, format!("unparseable {BIRTH_YEAR} '{text}'"))
            })?),
            None => None,
        };

        Ok(TripRecord::new(
            start_time,
            end_time,
            trip_duration,
            required(self.start_station, START_STATION)?,
            required(self.end_station, END_STATION)?,
            user_type,
        )
        .with_gender(gender)
        .with_birth_year(birth_year))
    }
}

fn cell(row: &[Option<String>], index: usize) -> Option<&str> {
    row.get(index)
        .and_then(Option::as_deref)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// Parses every row of `table` into a [`Dataset`], preserving row order.
///
/// # Errors
///
/// Returns [`BikeshareError::Load`] when a required column is missing or any
/// row fails to parse. No partial dataset is returned.
pub fn load(table: &RawTable) -> Result<Dataset> {
    let columns = ColumnIndex::resolve(table)?;
    let fields = columns.fields();

    let records = table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| columns.parse_row(i + 1, row))
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(
        rows = records.len(),
        gender = fields.gender,
        birth_year = fields.birth_year,
        "Loaded trip records"
    );

    Ok(Dataset::new(records, fields))
}
