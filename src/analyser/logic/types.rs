use crate::error::{BikeshareError, Result};
use chrono::{Datelike as _, NaiveDateTime, Timelike as _, Weekday};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

// COLUMN NAMES

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

/// Month names accepted by the month filter. Index 0 is January.
pub const MONTH_NAMES: [&str; 6] = ["January", "February", "March", "April", "May", "June"];

/// Name of a filterable month (1 = January). `None` outside January..June.
pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(index).copied()
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// ISO day number (1 = Monday) to weekday.
pub fn weekday_from_number(day: u32) -> Option<Weekday> {
    match day {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

// RAW ROWS

/// Rows as handed over by the CSV reader: every cell is text, blank cells are `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// RECORDS

/// Which optional columns a dataset carries. Decided once per load from the header row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FieldSet {
    pub gender: bool,
    pub birth_year: bool,
}

impl FieldSet {
    pub const ALL: Self = Self {
        gender: true,
        birth_year: true,
    };
}

/// One ride.
///
/// `month`, `day_of_week` and `hour` are derived from `start_time` when the
/// record is built and are read-only afterwards. `day_of_week` uses ISO
/// numbering: 1 = Monday, 7 = Sunday.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub trip_duration: f64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: String,
    /// Blank cells are `None`; datasets without the column never set it.
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    month: u32,
    day_of_week: u32,
    hour: u32,
}

impl TripRecord {
    pub fn new(
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        trip_duration: f64,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
        user_type: impl Into<String>,
    ) -> Self {
        Self {
            start_time,
            end_time,
            trip_duration,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: user_type.into(),
            gender: None,
            birth_year: None,
            month: start_time.month(),
            day_of_week: start_time.weekday().number_from_monday(),
            hour: start_time.hour(),
        }
    }

    pub fn with_gender(mut self, gender: Option<String>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_birth_year(mut self, birth_year: Option<i32>) -> Self {
        self.birth_year = birth_year;
        self
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day_of_week(&self) -> u32 {
        self.day_of_week
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// Full weekday name, read straight from the calendar date of `start_time`.
    pub fn day_name(&self) -> &'static str {
        weekday_name(self.start_time.weekday())
    }
}

/// An ordered, immutable collection of trips for one city.
///
/// Records are shared, so a filtered view costs one pointer per kept row and
/// never copies or reorders the underlying trips.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Arc<TripRecord>>,
    fields: FieldSet,
}

impl Dataset {
    /// Builds a dataset. Optional values outside `fields` are dropped so that
    /// optionality stays a property of the whole dataset.
    pub fn new(records: Vec<TripRecord>, fields: FieldSet) -> Self {
        let records = records
            .into_iter()
            .map(|mut record| {
                if !fields.gender {
                    record.gender = None;
                }
                if !fields.birth_year {
                    record.birth_year = None;
                }
                Arc::new(record)
            })
            .collect();
        Self { records, fields }
    }

    pub(crate) fn from_shared(records: Vec<Arc<TripRecord>>, fields: FieldSet) -> Self {
        Self { records, fields }
    }

    pub fn records(&self) -> &[Arc<TripRecord>] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &TripRecord> {
        self.records.iter().map(Arc::as_ref)
    }

    pub fn fields(&self) -> FieldSet {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// FILTERS

/// Month and day-of-week predicate. `None` means "all".
///
/// Both parts may be set at once; a record must then match both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    month: Option<u32>,
    day: Option<u32>,
}

impl FilterSpec {
    pub const ALL: Self = Self {
        month: None,
        day: None,
    };

    /// # Errors
    ///
    /// Returns [`BikeshareError::InvalidFilter`] for a month outside 1..=6 or a
    /// day outside 1..=7.
    pub fn new(month: Option<u32>, day: Option<u32>) -> Result<Self> {
        if let Some(m) = month
            && month_name(m).is_none()
        {
            return Err(BikeshareError::InvalidFilter(format!(
                "month {m} is outside January (1) to June (6)"
            )));
        }
        if let Some(d) = day
            && weekday_from_number(d).is_none()
        {
            return Err(BikeshareError::InvalidFilter(format!(
                "day {d} is outside 1 (Monday) to 7 (Sunday)"
            )));
        }
        Ok(Self { month, day })
    }

    /// # Errors
    ///
    /// See [`FilterSpec::new`].
    pub fn by_month(month: u32) -> Result<Self> {
        Self::new(Some(month), None)
    }

    /// # Errors
    ///
    /// See [`FilterSpec::new`].
    pub fn by_day(day: u32) -> Result<Self> {
        Self::new(None, Some(day))
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    pub fn is_all(&self) -> bool {
        self.month.is_none() && self.day.is_none()
    }

    pub fn matches(&self, record: &TripRecord) -> bool {
        self.month.is_none_or(|m| record.month() == m)
            && self.day.is_none_or(|d| record.day_of_week() == d)
    }

    pub fn describe(&self) -> String {
        let month = self.month.and_then(month_name);
        let day = self.day.and_then(weekday_from_number).map(weekday_name);
        match (month, day) {
            (None, None) => "all trips".to_owned(),
            (Some(m), None) => format!("trips in {m}"),
            (None, Some(d)) => format!("trips on {d}s"),
            (Some(m), Some(d)) => format!("trips on {d}s in {m}"),
        }
    }
}

// STATISTICS

/// The most frequent value of something and how often it occurred.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Popular<T> {
    pub value: T,
    pub count: usize,
}

impl<T> Popular<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Popular<U> {
        Popular {
            value: f(self.value),
            count: self.count,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimeStats {
    pub popular_month: Popular<u32>,
    /// `None` when the busiest month is outside January..June.
    pub popular_month_name: Option<&'static str>,
    pub popular_day_name: Popular<&'static str>,
    pub popular_hour: Popular<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PopularTrip {
    pub start: String,
    pub end: String,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub popular_start: Popular<String>,
    pub popular_end: Popular<String>,
    pub popular_trip: PopularTrip,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DurationStats {
    pub total_seconds: f64,
    pub mean_seconds: f64,
    pub trip_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: Popular<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub user_type_counts: Vec<ValueCount>,
    /// Absent, not empty, when the dataset has no `Gender` column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender_counts: Option<Vec<ValueCount>>,
    /// Absent when there is no `Birth Year` column or no selected trip filled it in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_year_stats: Option<BirthYearStats>,
}

// REPORT

/// Result of one statistic group, kept even when the group had nothing to report.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "data")]
pub enum SectionOutcome<T> {
    Ready(T),
    Unavailable(String),
}

impl<T> SectionOutcome<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Section<T> {
    pub outcome: SectionOutcome<T>,
    #[serde(with = "duration_serde")]
    pub elapsed: Duration,
}

#[derive(Clone, Debug, Serialize)]
pub struct TripReport {
    pub city: String,
    pub filter: FilterSpec,
    pub fields: FieldSet,
    pub trip_count: usize,
    pub time: Section<TimeStats>,
    pub stations: Section<StationStats>,
    pub duration: Section<DurationStats>,
    pub users: Section<UserStats>,
}

mod duration_serde {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(duration.as_secs_f64())
    }
}
