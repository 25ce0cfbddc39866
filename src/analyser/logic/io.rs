use super::types::RawTable;
use crate::error::{BikeshareError, Result, ResultExt as _};
use polars::prelude::*;
use std::path::Path;

/// Reads a city CSV with every column as text, blank cells as `None`.
///
/// # Errors
///
/// [`BikeshareError::InvalidPath`] when the file does not exist and
/// [`BikeshareError::DataProcessing`] when Polars cannot decode it.
pub fn read_raw_table(path: &Path) -> Result<RawTable> {
    if !path.is_file() {
        return Err(BikeshareError::InvalidPath(format!(
            "{} does not exist",
            path.display()
        )));
    }

    // An inference length of zero makes Polars read every column as a string;
    // typing is the loader's job.
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()
        .and_then(LazyFrame::collect)
        .with_context(|| format!("Failed to read CSV {}", path.display()))?;

    tracing::debug!(rows = df.height(), columns = df.width(), path = %path.display(), "Read raw CSV");

    raw_table_from_df(&df)
}

/// Converts a frame into row-major text cells.
///
/// # Errors
///
/// [`BikeshareError::DataProcessing`] when a column cannot be cast to text.
pub fn raw_table_from_df(df: &DataFrame) -> Result<RawTable> {
    let mut headers = Vec::with_capacity(df.width());
    let mut columns = Vec::with_capacity(df.width());

    for col in df.get_columns() {
        headers.push(col.name().to_string());
        let series = col.as_materialized_series().cast(&DataType::String)?;
        let values: Vec<Option<String>> = series
            .str()?
            .into_iter()
            .map(|value| value.map(str::to_owned))
            .collect();
        columns.push(values.into_iter());
    }

    let rows = (0..df.height())
        .map(|_| columns.iter_mut().map(|col| col.next().flatten()).collect())
        .collect();

    Ok(RawTable::new(headers, rows))
}
