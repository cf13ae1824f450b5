//! DataFrame boundary
//!
//! Pulls a single string column out of a polars frame, and writes labels
//! back in place of the original values.

use crate::canon::{Canonicalizer, PassReport};
use crate::error::{CanonError, Result};
use polars::prelude::*;

/// Values of `column` as optional strings; non-string columns are cast
pub fn string_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    let series = df
        .column(column)
        .map_err(|_| CanonError::Column(format!("Column not found: {}", column)))?;
    let series = series.cast(&DataType::String)?;

    Ok(series
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// Replace `column` with `values`, keeping its position in the frame
pub fn replace_string_column(df: &mut DataFrame, column: &str, values: Vec<String>) -> Result<()> {
    if values.len() != df.height() {
        return Err(CanonError::Column(format!(
            "Column {} expects {} values, got {}",
            column,
            df.height(),
            values.len()
        )));
    }

    df.with_column(Series::new(column, values))?;
    Ok(())
}

/// Canonicalize one string column of `df` in place
pub fn canonicalize_frame_column(
    df: &mut DataFrame,
    column: &str,
    canonicalizer: &Canonicalizer,
) -> Result<PassReport> {
    let values = string_values(df, column)?;
    let (labels, report) = canonicalizer.canonicalize_column_with_report(&values);
    replace_string_column(df, column, labels)?;
    Ok(report)
}
