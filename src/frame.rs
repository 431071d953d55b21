//! Record-set helpers on top of Polars.
//!
//! Contact lists are loaded with schema inference switched off, so every
//! column is text and identifiers such as phone or member numbers keep their
//! leading zeros. The helpers below never fail because an optional column is
//! missing: they skip it and let the caller decide what that means.

use crate::error::{Result, ScrubError};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;

/// Options for reading a CSV into a [`DataFrame`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvLoadOptions {
    /// Skip cells that fail to parse instead of aborting.
    pub ignore_errors: bool,
    /// Accept rows with more fields than the header.
    pub truncate_ragged_lines: bool,
}

impl CsvLoadOptions {
    /// Strict options: any malformed row fails the read.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Relaxed options used for a second attempt after a strict read fails.
    pub fn relaxed() -> Self {
        Self {
            ignore_errors: true,
            truncate_ragged_lines: true,
        }
    }
}

/// Reads `path` into an all-text frame.
///
/// # Errors
///
/// Returns [`ScrubError::Read`] if the file is missing or not valid CSV.
pub fn load_csv(path: &Path, options: CsvLoadOptions) -> Result<DataFrame> {
    let read_error = |e: PolarsError| ScrubError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    if !path.is_file() {
        return Err(ScrubError::Read {
            path: path.to_path_buf(),
            message: "file does not exist".to_owned(),
        });
    }

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_ignore_errors(options.ignore_errors)
        .with_truncate_ragged_lines(options.truncate_ragged_lines)
        .finish()
        .map_err(read_error)?
        .collect()
        .map_err(read_error)?;

    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Loaded CSV"
    );
    Ok(df)
}

/// Writes `df` as comma-delimited UTF-8 with a header row. Nulls become empty fields.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    CsvWriter::new(file).include_header(true).finish(df)?;
    tracing::info!(path = %path.display(), rows = df.height(), "Wrote CSV");
    Ok(())
}

/// Column names in frame order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Trims surrounding whitespace from every column name, keeping order.
///
/// # Errors
///
/// Fails if two names collide once trimmed.
pub fn clean_headers(mut df: DataFrame) -> Result<DataFrame> {
    let trimmed: Vec<String> = column_names(&df)
        .iter()
        .map(|name| name.trim().to_owned())
        .collect();
    df.set_column_names(trimmed)?;
    Ok(df)
}

/// Text values of `column` in row order, `None` for nulls.
///
/// # Errors
///
/// Fails if the column is absent.
pub fn text_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    let series = df.column(column)?.as_materialized_series().cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_owned))
        .collect())
}

/// Writes `f(source)` for every non-null cell of `source` into `target`.
///
/// `target` is replaced if it exists and appended otherwise. Null cells stay null.
///
/// # Errors
///
/// Fails if `source` is absent.
pub fn derive_text_column<F>(
    mut df: DataFrame,
    source: &str,
    target: &str,
    f: F,
) -> Result<DataFrame>
where
    F: Fn(&str) -> Option<String>,
{
    let values: StringChunked = text_values(&df, source)?
        .iter()
        .map(|value| value.as_deref().and_then(&f))
        .collect();
    df.with_column(values.with_name(target.into()).into_series())?;
    Ok(df)
}

/// Replaces each non-null cell of `column` with `f(cell)`.
///
/// # Errors
///
/// Fails if the column is absent.
pub fn map_text_column<F>(df: DataFrame, column: &str, f: F) -> Result<DataFrame>
where
    F: Fn(&str) -> Option<String>,
{
    derive_text_column(df, column, column, f)
}

/// Adds or replaces `name` with `value` repeated on every row.
///
/// # Errors
///
/// Propagates Polars errors from inserting the column.
pub fn with_text_constant(mut df: DataFrame, name: &str, value: &str) -> Result<DataFrame> {
    let values = vec![value.to_owned(); df.height()];
    df.with_column(Series::new(name.into(), values))?;
    Ok(df)
}

/// Adds or replaces `name` with an all-null text column, written as empty fields.
///
/// # Errors
///
/// Propagates Polars errors from inserting the column.
pub fn with_empty_column(mut df: DataFrame, name: &str) -> Result<DataFrame> {
    df.with_column(Series::full_null(name.into(), df.height(), &DataType::String))?;
    Ok(df)
}

/// Adds or replaces `name` with the integer `value` repeated on every row.
///
/// # Errors
///
/// Propagates Polars errors from inserting the column.
pub fn with_int_constant(mut df: DataFrame, name: &str, value: i64) -> Result<DataFrame> {
    let values = vec![value; df.height()];
    df.with_column(Series::new(name.into(), values))?;
    Ok(df)
}

/// Renames the columns listed in `mapping` that are present; others are left alone.
///
/// # Errors
///
/// Fails if a rename produces a duplicate column name.
pub fn rename_existing(mut df: DataFrame, mapping: &HashMap<String, String>) -> Result<DataFrame> {
    let renamed: Vec<String> = column_names(&df)
        .into_iter()
        .map(|name| mapping.get(&name).cloned().unwrap_or(name))
        .collect();
    df.set_column_names(renamed)?;
    Ok(df)
}

/// Keeps the columns of `wanted` that exist, in `wanted` order.
///
/// Returns the projected frame and the names that were kept.
///
/// # Errors
///
/// Propagates Polars errors from the selection.
pub fn project_existing(df: &DataFrame, wanted: &[String]) -> Result<(DataFrame, Vec<String>)> {
    let kept: Vec<String> = wanted
        .iter()
        .filter(|name| has_column(df, name))
        .cloned()
        .collect();
    let projected = df.select(kept.iter().map(String::as_str))?;
    Ok((projected, kept))
}

/// Keeps rows whose flag is set, preserving order.
///
/// # Errors
///
/// Fails if `keep` does not have one flag per row.
pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask: BooleanChunked = keep.iter().copied().collect();
    Ok(df.filter(&mask)?)
}
