//! Centralized error handling for bikeshare.
//!
//! Every fallible operation in the library returns [`Result`], whose error
//! side is [`BikeshareError`]. The variants split into two groups:
//!
//! - **Pipeline errors** raised by the core: [`BikeshareError::Load`],
//!   [`BikeshareError::NoData`], [`BikeshareError::InvalidFilter`] and
//!   [`BikeshareError::PaginationExhausted`].
//! - **Environment errors** from the surrounding tool: I/O, CSV decoding,
//!   configuration and bad paths.
//!
//! `NoData` is returned per aggregator, so one empty statistic group never
//! prevents its siblings from being computed:
//!
//! ```
//! use bikeshare::error::BikeshareError;
//!
//! fn describe(err: &BikeshareError) -> &'static str {
//!     match err {
//!         BikeshareError::NoData(_) => "nothing to summarise",
//!         BikeshareError::Load { .. } => "dataset could not be loaded",
//!         _ => "unexpected failure",
//!     }
//! }
//! # assert_eq!(describe(&BikeshareError::NoData("trip duration")), "nothing to summarise");
//! ```
//!
//! The [`ResultExt`] trait adds `.context()` to any result whose error can be
//! turned into a [`BikeshareError`].

use std::fmt;

/// Main error type for bikeshare operations.
#[derive(Debug)]
pub enum BikeshareError {
    /// Raw rows could not be turned into trip records. Fatal for the whole load.
    Load {
        /// 1-based data row that failed, when the failure is row specific.
        row: Option<usize>,
        message: String,
    },

    /// A statistic is undefined because the dataset has no records.
    NoData(&'static str),

    /// A filter names a month outside January..June or a day outside 1..7.
    InvalidFilter(String),

    /// `next_page` was called after the paginator already reported exhaustion.
    PaginationExhausted,

    /// I/O errors (config files, terminal)
    Io(std::io::Error),

    /// CSV decoding errors surfaced by Polars
    DataProcessing(String),

    /// Configuration errors, including unknown cities
    Config(String),

    /// File not found or invalid path
    InvalidPath(String),
}

impl BikeshareError {
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            row: None,
            message: message.into(),
        }
    }

    pub fn load_at(row: usize, message: impl Into<String>) -> Self {
        Self::Load {
            row: Some(row),
            message: message.into(),
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData(_))
    }
}

impl fmt::Display for BikeshareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load {
                row: Some(row),
                message,
            } => write!(f, "Load error at row {row}: {message}"),
            Self::Load { row: None, message } => write!(f, "Load error: {message}"),
            Self::NoData(what) => write!(f, "No data available to compute {what} statistics"),
            Self::InvalidFilter(msg) => write!(f, "Invalid filter: {msg}"),
            Self::PaginationExhausted => write!(f, "No more pages of raw data"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::InvalidPath(msg) => write!(f, "Invalid path: {msg}"),
        }
    }
}

impl std::error::Error for BikeshareError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BikeshareError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for BikeshareError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for BikeshareError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

/// Result type alias for bikeshare operations.
pub type Result<T, E = BikeshareError> = std::result::Result<T, E>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped with `msg`.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped with the closure's message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<BikeshareError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| wrap(msg.into(), e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(f(), e.into()))
    }
}

// Pipeline errors keep their variant so callers can still match on them.
fn wrap(msg: String, err: BikeshareError) -> BikeshareError {
    match err {
        BikeshareError::Load { row, message } => BikeshareError::Load {
            row,
            message: format!("{msg}: {message}"),
        },
        BikeshareError::InvalidPath(path) => BikeshareError::InvalidPath(format!("{msg}: {path}")),
        BikeshareError::Io(e) => BikeshareError::Io(std::io::Error::new(e.kind(), format!("{msg}: {e}"))),
        BikeshareError::DataProcessing(m) => BikeshareError::DataProcessing(format!("{msg}: {m}")),
        BikeshareError::Config(m) => BikeshareError::Config(format!("{msg}: {m}")),
        other @ (BikeshareError::NoData(_)
        | BikeshareError::InvalidFilter(_)
        | BikeshareError::PaginationExhausted) => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BikeshareError::load_at(3, "unparseable Start Time '2017-13-40'");
        assert_eq!(
            err.to_string(),
            "Load error at row 3: unparseable Start Time '2017-13-40'"
        );
        assert_eq!(
            BikeshareError::NoData("trip duration").to_string(),
            "No data available to compute trip duration statistics"
        );
    }

    #[test]
    fn test_result_context_keeps_variant() {
        let result: Result<()> = Err(BikeshareError::load_at(7, "bad duration"));
        let err = result.context("Loading chicago").unwrap_err();
        match err {
            BikeshareError::Load { row, message } => {
                assert_eq!(row, Some(7));
                assert_eq!(message, "Loading chicago: bad duration");
            }
            other => panic!("expected load error, got {other:?}"),
        }
    }

    #[test]
    fn test_io_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "config.json",
        ));

        let result: Result<()> = result.context("Failed to read config");
        let err = result.unwrap_err();
        assert!(matches!(err, BikeshareError::Io(_)));
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_no_data_passes_through_context() {
        let result: Result<()> = Err(BikeshareError::NoData("station"));
        assert!(result.context("ignored").unwrap_err().is_no_data());
    }
}
