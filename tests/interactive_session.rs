//! Drives the interactive session with scripted answers against the fixture data.

use anyhow::Result;
use bikeshare::config::{AppConfig, load_app_config, save_app_config};
use bikeshare::prompt::Session;
use std::path::PathBuf;

/// Config pointing at `testdata/`, written to and read back from a scratch file.
fn fixture_config(dir: &tempfile::TempDir) -> Result<AppConfig> {
    let config = AppConfig {
        data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata"),
        cities: [
            ("chicago", "chicago_sample.csv"),
            ("washington", "washington_sample.csv"),
            ("atlantis", "atlantis.csv"),
        ]
        .into_iter()
        .map(|(city, file)| (city.to_owned(), file.to_owned()))
        .collect(),
        log_to_file: false,
    };

    let path = dir.path().join("config.json");
    save_app_config(&config, &path)?;
    Ok(load_app_config(&path)?)
}

fn run_script(config: &AppConfig, script: &str) -> Result<String> {
    let mut session = Session::new(script.as_bytes(), Vec::new(), config);
    session.run()?;
    Ok(String::from_utf8(session.into_output())?)
}

#[test]
fn test_month_filter_with_raw_data() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = fixture_config(&dir)?;

    // March has a single Chicago trip: one short page, then the end of the data.
    let transcript = run_script(&config, "Chicago\nmonth\nmarch\nyes\nyes\nno\n")?;

    assert!(transcript.starts_with("Hello! Let's explore some US bikeshare data!"));
    assert!(transcript.contains("Showing trips in March for Chicago (1 trips)"));
    assert!(transcript.contains("Most common day of week: Monday (1 trips)"));
    assert!(transcript.contains("Start Station: Christiana Ave & Lawrence Ave"));
    assert!(transcript.contains("Birth Year: 1986"));
    assert!(transcript.contains("No more raw data to display."));
    assert!(transcript.ends_with("Goodbye!\n"));
    Ok(())
}

#[test]
fn test_invalid_answers_are_asked_again() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = fixture_config(&dir)?;

    let transcript = run_script(
        &config,
        "boston\nwashington\nweekly\nday\nsunday\n9\n7\nmaybe\nno\nno\n",
    )?;

    assert!(transcript.contains("Invalid input. Please choose one of: Atlantis, Chicago, Washington."));
    assert!(transcript.contains("Invalid input. Please choose 'month', 'day', or 'none'."));
    assert!(transcript.contains("Invalid input. Please enter a valid number."));
    assert!(transcript.contains("Invalid input. Please enter a number between 1 and 7."));
    assert!(transcript.contains("Invalid input. Please enter yes or no."));
    assert!(transcript.contains("Showing trips on Sundays for Washington (2 trips)"));
    assert!(transcript.contains("Gender data is not available for this city."));
    Ok(())
}

#[test]
fn test_load_error_then_restart() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = fixture_config(&dir)?;

    let transcript = run_script(&config, "atlantis\nnone\nyes\nwashington\nnone\nno\nno\n")?;

    assert!(transcript.contains("Error loading data: Invalid path:"));
    assert!(transcript.contains("Showing all trips for Washington (7 trips)"));
    assert_eq!(transcript.matches("Would you like to restart?").count(), 2);
    Ok(())
}

#[test]
fn test_empty_month_reports_no_data() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = fixture_config(&dir)?;

    let transcript = run_script(&config, "washington\nmonth\njanuary\nyes\nno\n")?;

    assert!(transcript.contains("No trips were recorded in January."));
    assert!(transcript.contains("No data available to compute trip duration statistics."));
    assert!(transcript.contains("No more raw data to display."));
    Ok(())
}

#[test]
fn test_end_of_input_ends_session() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = fixture_config(&dir)?;

    let transcript = run_script(&config, "chicago\n")?;
    assert!(transcript.ends_with("Goodbye!\n"));
    assert!(!transcript.contains("Showing"));
    Ok(())
}
