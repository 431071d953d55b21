//! SMS-campaign scrubber.
//!
//! Rows whose `Person_id` is not a UUID are written to a dated side file and
//! left out of the main output. The surviving rows get normalized phone
//! numbers and birth dates; a date that cannot be read is replaced by a
//! diagnostic string that still carries the original text.

use super::PipelineReport;
use crate::config::SmsSchema;
use crate::error::Result;
use crate::frame::{
    CsvLoadOptions, clean_headers, filter_rows, has_column, load_csv, map_text_column,
    project_existing, rename_existing, save_csv, text_values, with_empty_column,
    with_int_constant, with_text_constant,
};
use crate::scrub::{DateFailurePolicy, DateNormalizer, is_valid_person_id, normalize_phone};
use chrono::{Datelike as _, Local, NaiveDate};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Operator inputs for one SMS scrub run.
#[derive(Debug, Clone)]
pub struct SmsOptions {
    pub insert_group: i64,
    pub group_name: String,
    pub schema: SmsSchema,
    /// Day the run is considered to happen on; dates the side file and resolves two-digit years
    pub run_date: NaiveDate,
}

impl SmsOptions {
    pub fn new(insert_group: i64, group_name: impl Into<String>) -> Self {
        Self {
            insert_group,
            group_name: group_name.into(),
            schema: SmsSchema::default(),
            run_date: Local::now().date_naive(),
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: SmsSchema) -> Self {
        self.schema = schema;
        self
    }

    #[must_use]
    pub fn with_run_date(mut self, run_date: NaiveDate) -> Self {
        self.run_date = run_date;
        self
    }
}

/// Outcome of an SMS scrub run.
#[derive(Debug, Clone)]
pub struct SmsReport {
    pub report: PipelineReport,
    /// Rows set aside because their identifier is not a UUID
    pub invalid_rows: usize,
    /// Side file holding those rows, if any were found
    pub invalid_path: Option<PathBuf>,
    /// Whether the input had to be re-read with relaxed parsing
    pub relaxed_read: bool,
}

/// `<group_name>.csv` inside `output_dir`.
pub fn sms_output_path(output_dir: &Path, group_name: &str) -> PathBuf {
    output_dir.join(format!("{group_name}.csv"))
}

/// `<group_name>-invalid-data-<YYYY-MM-DD>.csv` inside `output_dir`.
pub fn invalid_data_path(output_dir: &Path, group_name: &str, run_date: NaiveDate) -> PathBuf {
    output_dir.join(format!(
        "{group_name}-invalid-data-{}.csv",
        run_date.format("%Y-%m-%d")
    ))
}

/// Scrubs `input` and writes `<group_name>.csv` into `output_dir`.
///
/// A strict read that fails is retried once with relaxed parsing before the
/// error is returned.
///
/// # Errors
///
/// Returns [`crate::error::ScrubError::Read`] if both reads fail, or an
/// error if an output file cannot be written.
pub fn run_sms_pipeline(input: &Path, output_dir: &Path, options: &SmsOptions) -> Result<SmsReport> {
    let start = Instant::now();
    let schema = &options.schema;

    let (df, relaxed_read) = match load_csv(input, CsvLoadOptions::strict()) {
        Ok(df) => (df, false),
        Err(err) => {
            tracing::warn!(error = %err, "Strict read failed, retrying with relaxed parsing");
            (load_csv(input, CsvLoadOptions::relaxed())?, true)
        }
    };
    let rows_before = df.height();

    let df = clean_headers(df)?;
    let df = with_empty_column(df, &schema.insert_group_column)?;
    let df = with_empty_column(df, &schema.group_name_column)?;

    let (df, invalid) = split_invalid_ids(df, schema)?;
    let invalid_rows = invalid.as_ref().map_or(0, DataFrame::height);
    let invalid_path = match invalid {
        Some(mut invalid_df) if invalid_df.height() > 0 => {
            let path = invalid_data_path(output_dir, &options.group_name, options.run_date);
            tracing::warn!(
                rows = invalid_df.height(),
                path = %path.display(),
                "Invalid GUIDs found, logging rows to side file"
            );
            save_csv(&mut invalid_df, &path)?;
            Some(path)
        }
        _ => None,
    };

    let df = normalize_fields(df, schema, options.run_date.year())?;
    let df = with_int_constant(df, &schema.insert_group_column, options.insert_group)?;
    let df = with_text_constant(df, &schema.group_name_column, &options.group_name)?;

    let df = rename_existing(df, &schema.renames)?;
    let (mut df, columns) = project_existing(&df, &schema.output_columns)?;

    let output_path = sms_output_path(output_dir, &options.group_name);
    save_csv(&mut df, &output_path)?;

    Ok(SmsReport {
        report: PipelineReport {
            rows_before,
            rows_after: df.height(),
            columns,
            output_path,
            warnings: Vec::new(),
            duration: start.elapsed(),
        },
        invalid_rows,
        invalid_path,
        relaxed_read,
    })
}

/// Splits off rows whose identifier is not a UUID.
///
/// Returns the valid rows and, when the identifier column exists, the
/// rejected ones. Without the column every row is kept.
fn split_invalid_ids(df: DataFrame, schema: &SmsSchema) -> Result<(DataFrame, Option<DataFrame>)> {
    if !has_column(&df, &schema.id_column) {
        tracing::info!(
            column = %schema.id_column,
            "No identifier column found, skipping GUID validation"
        );
        return Ok((df, None));
    }

    let valid: Vec<bool> = text_values(&df, &schema.id_column)?
        .iter()
        .map(|value| value.as_deref().is_some_and(is_valid_person_id))
        .collect();
    let invalid: Vec<bool> = valid.iter().map(|keep| !keep).collect();

    Ok((filter_rows(&df, &valid)?, Some(filter_rows(&df, &invalid)?)))
}

fn normalize_fields(df: DataFrame, schema: &SmsSchema, current_year: i32) -> Result<DataFrame> {
    let mut df = df;

    if has_column(&df, &schema.phone_column) {
        df = map_text_column(df, &schema.phone_column, |value| Some(normalize_phone(value)))?;
    }

    if has_column(&df, &schema.dob_column) {
        let normalizer =
            DateNormalizer::new(DateFailurePolicy::Diagnostic).with_current_year(current_year);
        df = map_text_column(df, &schema.dob_column, |value| normalizer.normalize(value))?;
    }

    if has_column(&df, &schema.first_name_column) {
        df = map_text_column(df, &schema.first_name_column, |value| {
            Some(value.trim_matches(' ').to_owned())
        })?;
    }

    Ok(df)
}
