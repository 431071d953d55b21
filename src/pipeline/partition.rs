//! Duplicate / missing-identifier partitioner.
//!
//! Splits a contact list three ways, keeping input order in each output:
//!
//! - every row whose phone occurs more than once (all occurrences)
//! - every row with an empty identifier
//! - the rest: unique phone and a non-empty identifier
//!
//! The first two sets can overlap; the third never overlaps either.

use crate::config::PartitionSchema;
use crate::error::{Result, ScrubError};
use crate::frame::{
    CsvLoadOptions, clean_headers, filter_rows, has_column, load_csv, save_csv, text_values,
};
use std::collections::HashMap;
use std::path::PathBuf;

/// Inputs for one partitioner run.
#[derive(Debug, Clone)]
pub struct PartitionOptions {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub schema: PartitionSchema,
}

impl PartitionOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: PathBuf::from("."),
            schema: PartitionSchema::default(),
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: PartitionSchema) -> Self {
        self.schema = schema;
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}

/// Row counts and output files of a partitioner run.
#[derive(Debug, Clone)]
pub struct PartitionReport {
    pub total: usize,
    pub duplicates: usize,
    pub missing_id: usize,
    pub unique: usize,
    pub duplicates_path: PathBuf,
    pub missing_id_path: PathBuf,
    pub unique_path: PathBuf,
}

impl PartitionReport {
    /// One line per count, in the order operators expect to read them
    pub fn summary_lines(&self, id_column: &str) -> Vec<String> {
        vec![
            format!("Total records processed: {}", self.total),
            format!("Records with duplicate phone numbers: {}", self.duplicates),
            format!("Records with missing {id_column}: {}", self.missing_id),
            format!("Records with unique phone numbers: {}", self.unique),
        ]
    }
}

/// Row masks for the three outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Partition {
    duplicates: Vec<bool>,
    missing_id: Vec<bool>,
    unique: Vec<bool>,
}

impl Partition {
    /// Empty phones are compared like any other value, so several rows
    /// without a phone count as duplicates of each other.
    fn classify(phones: &[Option<String>], ids: &[Option<String>]) -> Self {
        let mut counts: HashMap<Option<&str>, usize> = HashMap::new();
        for phone in phones {
            *counts.entry(phone.as_deref()).or_default() += 1;
        }

        let duplicates: Vec<bool> = phones
            .iter()
            .map(|phone| counts.get(&phone.as_deref()).is_some_and(|&count| count > 1))
            .collect();
        let missing_id: Vec<bool> = ids
            .iter()
            .map(|id| id.as_deref().is_none_or(str::is_empty))
            .collect();
        let unique = duplicates
            .iter()
            .zip(&missing_id)
            .map(|(&duplicate, &missing)| !duplicate && !missing)
            .collect();

        Self {
            duplicates,
            missing_id,
            unique,
        }
    }
}

/// Splits the input and writes the three files into the output directory.
///
/// # Errors
///
/// Returns [`ScrubError::MissingColumn`] if the phone or identifier column is
/// absent, [`ScrubError::Read`] for an unreadable input, or an error if an
/// output cannot be written.
pub fn run_partition(options: &PartitionOptions) -> Result<PartitionReport> {
    let schema = &options.schema;
    let df = clean_headers(load_csv(&options.input, CsvLoadOptions::strict())?)?;

    for column in [&schema.phone_column, &schema.id_column] {
        if !has_column(&df, column) {
            return Err(ScrubError::MissingColumn {
                column: column.clone(),
                file: options.input.clone(),
            });
        }
    }

    let partition = Partition::classify(
        &text_values(&df, &schema.phone_column)?,
        &text_values(&df, &schema.id_column)?,
    );

    let mut duplicates = filter_rows(&df, &partition.duplicates)?;
    let mut missing_id = filter_rows(&df, &partition.missing_id)?;
    let mut unique = filter_rows(&df, &partition.unique)?;

    let duplicates_path = options.output_dir.join(&schema.duplicates_file);
    let missing_id_path = options.output_dir.join(&schema.missing_id_file);
    let unique_path = options.output_dir.join(&schema.unique_file);
    save_csv(&mut duplicates, &duplicates_path)?;
    save_csv(&mut missing_id, &missing_id_path)?;
    save_csv(&mut unique, &unique_path)?;

    let report = PartitionReport {
        total: df.height(),
        duplicates: duplicates.height(),
        missing_id: missing_id.height(),
        unique: unique.height(),
        duplicates_path,
        missing_id_path,
        unique_path,
    };
    tracing::info!(
        total = report.total,
        duplicates = report.duplicates,
        missing_id = report.missing_id,
        unique = report.unique,
        "Partitioned contact list"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_owned)).collect()
    }

    #[test]
    fn test_all_duplicate_occurrences_are_flagged() {
        let phones = column(&[
            Some("5550000001"),
            Some("5551234567"),
            Some("5550000002"),
            Some("5550000003"),
            Some("5551234567"),
        ]);
        let ids = column(&[Some("a"), Some("b"), Some("c"), Some("d"), Some("e")]);
        let partition = Partition::classify(&phones, &ids);
        assert_eq!(partition.duplicates, vec![false, true, false, false, true]);
        assert_eq!(partition.unique, vec![true, false, true, true, false]);
    }

    #[test]
    fn test_blank_identifier_never_unique() {
        let phones = column(&[Some("1"), Some("2"), Some("3")]);
        let ids = column(&[Some(""), None, Some("m-3")]);
        let partition = Partition::classify(&phones, &ids);
        assert_eq!(partition.missing_id, vec![true, true, false]);
        assert_eq!(partition.unique, vec![false, false, true]);
    }

    #[test]
    fn test_missing_phones_group_together() {
        let phones = column(&[None, None, Some("1")]);
        let ids = column(&[Some("a"), Some("b"), Some("c")]);
        let partition = Partition::classify(&phones, &ids);
        assert_eq!(partition.duplicates, vec![true, true, false]);
    }
}
