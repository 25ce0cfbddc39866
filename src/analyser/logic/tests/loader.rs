use super::{at, raw};
use crate::analyser::logic::loader::{load, parse_birth_year, parse_timestamp};
use crate::analyser::logic::types::FieldSet;
use crate::error::BikeshareError;
use anyhow::{Context as _, Result};

const FULL_HEADERS: &[&str] = &[
    "",
    "Start Time",
    "End Time",
    "Trip Duration",
    "Start Station",
    "End Station",
    "User Type",
    "Gender",
    "Birth Year",
];

const BASIC_HEADERS: &[&str] = &[
    "Start Time",
    "End Time",
    "Trip Duration",
    "Start Station",
    "End Station",
    "User Type",
];

#[test]
fn test_load_parses_rows_and_derives_fields() -> Result<()> {
    let table = raw(
        FULL_HEADERS,
        &[
            &[
                "1423854",
                "2017-01-02 09:07:57",
                "2017-01-02 09:20:53",
                "776",
                "Wood St & Hubbard St",
                "Damen Ave & Chicago Ave",
                "Subscriber",
                "Male",
                "1992.0",
            ],
            &[
                "955915",
                "2017-05-07 18:22:12",
                "2017-05-07 18:40:03",
                "1071.5",
                "Canal St & Adams St",
                "Clark St & Randolph St",
                "Customer",
                "Female",
                "1985",
            ],
        ],
    );

    let dataset = load(&table)?;
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.fields(), FieldSet::ALL);

    let first = dataset.iter().next().context("first record")?;
    assert_eq!(first.start_time, at("2017-01-02 09:07:57"));
    assert_eq!(first.trip_duration, 776.0);
    assert_eq!(first.start_station, "Wood St & Hubbard St");
    assert_eq!(first.gender.as_deref(), Some("Male"));
    assert_eq!(first.birth_year, Some(1992));
    assert_eq!((first.month(), first.day_of_week(), first.hour()), (1, 1, 9));
    assert_eq!(first.day_name(), "Monday");

    let second = dataset.iter().nth(1).context("second record")?;
    assert_eq!(second.trip_duration, 1071.5);
    assert_eq!((second.month(), second.day_of_week(), second.hour()), (5, 7, 18));
    assert_eq!(second.day_name(), "Sunday");
    Ok(())
}

#[test]
fn test_load_without_optional_columns() -> Result<()> {
    let table = raw(
        BASIC_HEADERS,
        &[&[
            "2017-06-23 15:09:32",
            "2017-06-23 15:14:53",
            "321.0",
            "Wilson Blvd & N Uhle St",
            "N Veitch St & 20th St N",
            "Subscriber",
        ]],
    );

    let dataset = load(&table)?;
    assert_eq!(dataset.fields(), FieldSet::default());
    let record = dataset.iter().next().context("record")?;
    assert_eq!(record.gender, None);
    assert_eq!(record.birth_year, None);
    Ok(())
}

#[test]
fn test_blank_optional_cells_load_as_absent() -> Result<()> {
    let table = raw(
        FULL_HEADERS,
        &[&[
            "1",
            "2017-03-06 08:00:00",
            "2017-03-06 08:10:00",
            "600",
            "A",
            "B",
            "",
            "",
            "",
        ]],
    );

    let dataset = load(&table)?;
    assert_eq!(dataset.fields(), FieldSet::ALL);
    let record = dataset.iter().next().context("record")?;
    assert_eq!(record.user_type, "");
    assert_eq!(record.gender, None);
    assert_eq!(record.birth_year, None);
    Ok(())
}

#[test]
fn test_bad_timestamp_fails_whole_load() {
    let table = raw(
        BASIC_HEADERS,
        &[
            &["2017-01-02 09:07:57", "2017-01-02 09:20:53", "776", "A", "B", "Subscriber"],
            &["yesterday", "2017-01-02 09:20:53", "776", "A", "B", "Subscriber"],
        ],
    );

    match load(&table) {
        Err(BikeshareError::Load { row, message }) => {
            assert_eq!(row, Some(2));
            assert!(message.contains("Start Time"), "{message}");
        }
        other => panic!("expected a load error, got {other:?}"),
    }
}

#[test]
fn test_bad_duration_fails_load() {
    let table = raw(
        BASIC_HEADERS,
        &[&["2017-01-02 09:07:57", "2017-01-02 09:20:53", "ten", "A", "B", "Subscriber"]],
    );

    let err = load(&table).expect_err("duration is not a number");
    assert!(err.to_string().contains("Trip Duration"), "{err}");
}

#[test]
fn test_blank_required_cell_fails_load() {
    let table = raw(
        BASIC_HEADERS,
        &[&["2017-01-02 09:07:57", "2017-01-02 09:20:53", "776", "", "B", "Subscriber"]],
    );

    let err = load(&table).expect_err("start station is required");
    assert!(matches!(err, BikeshareError::Load { row: Some(1), .. }));
}

#[test]
fn test_missing_required_column() {
    let table = raw(
        &["Start Time", "End Time", "Start Station", "End Station", "User Type"],
        &[],
    );

    let err = load(&table).expect_err("Trip Duration column is missing");
    match err {
        BikeshareError::Load { row, message } => {
            assert_eq!(row, None);
            assert!(message.contains("Trip Duration"));
        }
        other => panic!("expected a load error, got {other:?}"),
    }
}

#[test]
fn test_empty_table_loads_empty_dataset() -> Result<()> {
    let dataset = load(&raw(BASIC_HEADERS, &[]))?;
    assert!(dataset.is_empty());
    Ok(())
}

#[test]
fn test_parse_timestamp_formats() {
    let expected = at("2017-01-02 09:07:00");
    assert_eq!(parse_timestamp("2017-01-02 09:07:00"), Some(expected));
    assert_eq!(parse_timestamp(" 2017-01-02T09:07:00 "), Some(expected));
    assert_eq!(parse_timestamp("2017-01-02 09:07"), Some(expected));
    assert_eq!(parse_timestamp("01/02/2017 09:07"), Some(expected));
    assert_eq!(parse_timestamp("2017-02-30 09:07:00"), None);
    assert_eq!(parse_timestamp(""), None);
}

#[test]
fn test_parse_birth_year() {
    assert_eq!(parse_birth_year("1985"), Some(1985));
    assert_eq!(parse_birth_year("1985.0"), Some(1985));
    assert_eq!(parse_birth_year("1985.5"), None);
    assert_eq!(parse_birth_year("unknown"), None);
}
