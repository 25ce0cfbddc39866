//! # bikeshare - US bike-share trip statistics
//!
//! Loads trip records for one city, narrows them by month and/or weekday, and
//! reports the most popular travel times, stations and trips, total and mean
//! duration, and rider demographics. Filtered trips can also be paged through
//! five at a time.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bikeshare::analyser::logic::{FilterSpec, filter, load_city, run_statistics};
//! use bikeshare::config::AppConfig;
//!
//! # fn example() -> bikeshare::error::Result<()> {
//! let config = AppConfig::default();
//! let trips = load_city(&config, "chicago")?;
//! let march = filter(&trips, &FilterSpec::by_month(3)?);
//! let report = run_statistics("chicago", FilterSpec::by_month(3)?, &march);
//! print!("{}", bikeshare::report::render_report(&report));
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`analyser`]: loading, filtering, statistics and paging
//!   - [`analyser::logic`]: the pipeline itself
//! - [`config`]: city → data file table and other settings
//! - [`prompt`]: input validation and the interactive session
//! - [`report`]: plain-text rendering
//! - [`error`]: error type and context helpers
//! - [`logging`]: `tracing` subscriber setup
//!
//! ## Pipeline
//!
//! ```text
//! CSV file ─read_raw_table─> RawTable ─load─> Dataset ─filter─> Dataset
//!                                                        ├─> summarize_* ─> TripReport
//!                                                        └─> RawDataPager ─> pages of 5
//! ```
//!
//! The aggregators never mutate their input and report
//! [`error::BikeshareError::NoData`] on an empty dataset instead of a
//! placeholder value.

pub mod analyser;
pub mod config;
pub mod error;
pub mod logging;
pub mod prompt;
pub mod report;
