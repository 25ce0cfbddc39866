//! Interactive exploration session.
//!
//! Answers are checked by small pure `parse_*` functions; [`Session`] only
//! asks, re-asks on a [`ValidationError`], and hands valid selections to the
//! analysis pipeline. Running out of input ends the session quietly.

use crate::analyser::logic::types::{MONTH_NAMES, month_name};
use crate::analyser::logic::{
    Dataset, FilterSpec, PAGE_SIZE, RawDataPager, filter, load_city, run_statistics,
};
use crate::config::AppConfig;
use crate::error::Result;
use crate::report::{RULE, render_page, render_report, title_case};
use std::fmt;
use std::io::{BufRead, Write};

/// A rejected answer, with the message shown before asking again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(String);

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Month,
    Day,
    None,
}

/// # Errors
///
/// When `input` names no configured city.
pub fn parse_city<'c>(input: &str, config: &'c AppConfig) -> Result<&'c str, ValidationError> {
    config.canonical_city(input).ok_or_else(|| {
        ValidationError::new(format!(
            "Invalid input. Please choose one of: {}.",
            config
                .city_names()
                .map(title_case)
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })
}

/// # Errors
///
/// When `input` is not `month`, `day` or `none`.
pub fn parse_filter_kind(input: &str) -> Result<FilterKind, ValidationError> {
    match input.trim().to_lowercase().as_str() {
        "month" => Ok(FilterKind::Month),
        "day" => Ok(FilterKind::Day),
        "none" => Ok(FilterKind::None),
        _ => Err(ValidationError::new(
            "Invalid input. Please choose 'month', 'day', or 'none'.",
        )),
    }
}

/// Month name (January..June, any case) to its number.
///
/// # Errors
///
/// When `input` is not one of the six filterable months.
pub fn parse_month(input: &str) -> Result<u32, ValidationError> {
    let wanted = input.trim();
    MONTH_NAMES
        .iter()
        .zip(1..)
        .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
        .map(|(_, number)| number)
        .ok_or_else(|| ValidationError::new("Invalid input. Please choose a valid month."))
}

/// # Errors
///
/// When `input` is not an integer from 1 to 7.
pub fn parse_day(input: &str) -> Result<u32, ValidationError> {
    let day: u32 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::new("Invalid input. Please enter a valid number."))?;
    if (1..=7).contains(&day) {
        Ok(day)
    } else {
        Err(ValidationError::new(
            "Invalid input. Please enter a number between 1 and 7.",
        ))
    }
}

/// # Errors
///
/// When `input` is neither yes nor no.
pub fn parse_yes_no(input: &str) -> Result<bool, ValidationError> {
    match input.trim().to_lowercase().as_str() {
        "yes" | "y" => Ok(true),
        "no" | "n" => Ok(false),
        _ => Err(ValidationError::new("Invalid input. Please enter yes or no.")),
    }
}

/// A city plus the filter chosen for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub city: String,
    pub filter: FilterSpec,
}

pub struct Session<'c, R, W> {
    input: R,
    output: W,
    config: &'c AppConfig,
}

impl<'c, R: BufRead, W: Write> Session<'c, R, W> {
    pub fn new(input: R, output: W, config: &'c AppConfig) -> Self {
        Self {
            input,
            output,
            config,
        }
    }

    /// Runs selection → statistics → raw data → restart until the user stops.
    ///
    /// # Errors
    ///
    /// Only terminal I/O failures. Data problems are reported to the user and
    /// the session moves on to the restart question.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Hello! Let's explore some US bikeshare data!")?;

        loop {
            let Some(selection) = self.ask_selection()? else {
                break;
            };
            tracing::info!(city = %selection.city, filter = ?selection.filter, "Selection made");
            self.explore(&selection)?;

            let restart = self.ask("\nWould you like to restart? Enter yes or no.", parse_yes_no)?;
            if restart != Some(true) {
                break;
            }
        }

        writeln!(self.output, "Goodbye!")?;
        Ok(())
    }

    /// `None` when input ran out before a full selection was made.
    ///
    /// # Errors
    ///
    /// Terminal I/O failures.
    pub fn ask_selection(&mut self) -> Result<Option<Selection>> {
        let config = self.config;
        let cities = config
            .city_names()
            .map(title_case)
            .collect::<Vec<_>>()
            .join(", ");

        let Some(city) = self.ask(
            &format!("\nWhich city would you like to explore? ({cities})"),
            |answer| parse_city(answer, config).map(str::to_owned),
        )?
        else {
            return Ok(None);
        };

        let Some(kind) = self.ask(
            "\nWould you like to filter the data by month, day, or not at all? Type \"none\" for no time filter.",
            parse_filter_kind,
        )?
        else {
            return Ok(None);
        };

        let filter = match kind {
            FilterKind::None => FilterSpec::ALL,
            FilterKind::Month => {
                let months = MONTH_NAMES.join(", ");
                let Some(month) = self.ask(&format!("\nWhich month? {months}?"), parse_month)?
                else {
                    return Ok(None);
                };
                FilterSpec::by_month(month)?
            }
            FilterKind::Day => {
                let Some(day) = self.ask(
                    "\nWhich day? Please type your response as an integer (1=Monday ... 7=Sunday).",
                    parse_day,
                )?
                else {
                    return Ok(None);
                };
                FilterSpec::by_day(day)?
            }
        };

        writeln!(self.output, "{RULE}")?;
        Ok(Some(Selection { city, filter }))
    }

    fn explore(&mut self, selection: &Selection) -> Result<()> {
        let dataset = match load_city(self.config, &selection.city) {
            Ok(dataset) => dataset,
            Err(err) => {
                tracing::warn!(city = %selection.city, "Load failed: {err}");
                writeln!(self.output, "Error loading data: {err}")?;
                return Ok(());
            }
        };

        let filtered = filter(&dataset, &selection.filter);
        if let Some(month) = selection.filter.month()
            && filtered.is_empty()
        {
            let name = month_name(month).unwrap_or("that month");
            writeln!(self.output, "No trips were recorded in {name}.")?;
        }

        let report = run_statistics(&selection.city, selection.filter, &filtered);
        write!(self.output, "{}", render_report(&report))?;
        self.browse_raw_data(&filtered)
    }

    fn browse_raw_data(&mut self, dataset: &Dataset) -> Result<()> {
        let mut pager = RawDataPager::new(dataset);
        let question = format!("\nWould you like to see {PAGE_SIZE} lines of raw data? Enter yes or no.");

        while self.ask(&question, parse_yes_no)? == Some(true) {
            let page = pager.next_page()?;
            if page.is_empty() {
                writeln!(self.output, "No more raw data to display.")?;
                break;
            }
            write!(self.output, "\n{}", render_page(page, dataset.fields()))?;
        }
        Ok(())
    }

    /// Asks until `parse` accepts the answer. `None` at end of input.
    fn ask<T>(
        &mut self,
        question: &str,
        parse: impl Fn(&str) -> Result<T, ValidationError>,
    ) -> Result<Option<T>> {
        loop {
            writeln!(self.output, "{question}")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                tracing::debug!("Input closed while waiting for an answer");
                return Ok(None);
            }

            match parse(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(err) => writeln!(self.output, "{err}")?,
            }
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
