//! Email-campaign scrubber.
//!
//! Tags every row with the operator's insert group and group name,
//! normalizes birth dates (unreadable dates become empty), blanks identifiers
//! that are not UUIDs, then renames and reorders columns to the import layout.

use super::PipelineReport;
use crate::config::EmailSchema;
use crate::error::Result;
use crate::frame::{
    CsvLoadOptions, clean_headers, has_column, load_csv, map_text_column, project_existing,
    rename_existing, save_csv, text_values, with_int_constant, with_text_constant,
};
use crate::scrub::{DateFailurePolicy, DateNormalizer, is_iso_date, is_valid_person_id};
use chrono::{Datelike as _, Local, NaiveDate};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Number of birth-date values echoed to the log when the final check fails.
const DOB_PREVIEW_ROWS: usize = 5;

/// Operator inputs for one email scrub run.
#[derive(Debug, Clone)]
pub struct EmailOptions {
    pub insert_group: i64,
    pub group_name: String,
    pub schema: EmailSchema,
    /// Day the run is considered to happen on; two-digit years are resolved against its year
    pub run_date: NaiveDate,
}

impl EmailOptions {
    pub fn new(insert_group: i64, group_name: impl Into<String>) -> Self {
        Self {
            insert_group,
            group_name: group_name.into(),
            schema: EmailSchema::default(),
            run_date: Local::now().date_naive(),
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: EmailSchema) -> Self {
        self.schema = schema;
        self
    }

    #[must_use]
    pub fn with_run_date(mut self, run_date: NaiveDate) -> Self {
        self.run_date = run_date;
        self
    }

    fn normalizer(&self) -> DateNormalizer {
        DateNormalizer::new(DateFailurePolicy::Null).with_current_year(self.run_date.year())
    }
}

/// `<group_name>_mass_email.csv` inside `output_dir`.
pub fn email_output_path(output_dir: &Path, group_name: &str) -> PathBuf {
    output_dir.join(format!("{group_name}_mass_email.csv"))
}

/// Scrubs `input` and writes `<group_name>_mass_email.csv` into `output_dir`.
///
/// Missing optional columns are skipped. Nothing is written if the input
/// cannot be read.
///
/// # Errors
///
/// Returns [`crate::error::ScrubError::Read`] for an unreadable input, or
/// an error if the output cannot be written.
pub fn run_email_pipeline(
    input: &Path,
    output_dir: &Path,
    options: &EmailOptions,
) -> Result<PipelineReport> {
    let start = Instant::now();
    let schema = &options.schema;
    let normalizer = options.normalizer();
    let mut warnings = Vec::new();

    let df = load_csv(input, CsvLoadOptions::strict())?;
    let rows_before = df.height();

    let df = clean_headers(df)?;
    let df = with_int_constant(df, &schema.insert_group_column, options.insert_group)?;
    let df = with_text_constant(df, &schema.group_name_column, &options.group_name)?;

    let df = if has_column(&df, &schema.dob_column) {
        map_text_column(df, &schema.dob_column, |value| normalizer.normalize(value))?
    } else {
        df
    };

    let df = if has_column(&df, &schema.id_column) {
        map_text_column(df, &schema.id_column, |value| {
            is_valid_person_id(value).then(|| value.to_owned())
        })?
    } else {
        df
    };

    let df = rename_existing(df, &schema.renames)?;
    let (df, columns) = project_existing(&df, &schema.output_columns)?;
    let mut df = recheck_birth_dates(df, &schema.output_dob_column, &normalizer, &mut warnings)?;

    let output_path = email_output_path(output_dir, &options.group_name);
    save_csv(&mut df, &output_path)?;

    Ok(PipelineReport {
        rows_before,
        rows_after: df.height(),
        columns,
        output_path,
        warnings,
        duration: start.elapsed(),
    })
}

/// Verifies every value in `column` is `YYYY-MM-DD` and re-normalizes the ones that are not.
///
/// Values already in ISO shape are kept, so a column that arrived under its
/// output name is still normalized while earlier results are left alone.
fn recheck_birth_dates(
    df: DataFrame,
    column: &str,
    normalizer: &DateNormalizer,
    warnings: &mut Vec<String>,
) -> Result<DataFrame> {
    if !has_column(&df, column) {
        return Ok(df);
    }

    let values = text_values(&df, column)?;
    let failures = values
        .iter()
        .filter(|value| !value.as_deref().is_some_and(is_iso_date))
        .count();

    if failures == 0 {
        tracing::info!(column, "DOB column processed successfully");
        return Ok(df);
    }

    let preview: Vec<&str> = values
        .iter()
        .take(DOB_PREVIEW_ROWS)
        .map(|value| value.as_deref().unwrap_or(""))
        .collect();
    tracing::warn!(
        column,
        failures,
        ?preview,
        "DOB ERROR: Some dates could not be converted"
    );
    warnings.push(format!(
        "{failures} value(s) in '{column}' are not YYYY-MM-DD"
    ));

    map_text_column(df, column, |value| {
        if is_iso_date(value) {
            Some(value.to_owned())
        } else {
            normalizer.normalize(value)
        }
    })
}
