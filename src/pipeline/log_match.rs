//! Delivery-log matcher.
//!
//! Joins a contact list against a messaging provider's delivery log on phone
//! number and adds a `0`/`1` flag saying whether the log reports the message
//! as delivered or sent.
//!
//! By default both sides are keyed by normalizing their phone columns with
//! [`join_key`], which drops a leading `1` only from an 11-digit number. The
//! legacy layout, where both files already carry a normalized key column, is
//! available through [`JoinKeys::Precomputed`].

use crate::config::LogMatchSchema;
use crate::error::{Result, ScrubError};
use crate::frame::{
    CsvLoadOptions, clean_headers, derive_text_column, has_column, load_csv, save_csv,
    text_values,
};
use polars::prelude::{DataFrame, NamedFrom as _, Series};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Where the join key on each side comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinKeys {
    /// Normalize a phone column on each side
    Normalize {
        contact_phone: String,
        log_phone: String,
    },
    /// Use key columns that are already present on both files
    Precomputed {
        contact_key: String,
        log_key: String,
    },
}

impl JoinKeys {
    pub fn normalize_from(schema: &LogMatchSchema) -> Self {
        Self::Normalize {
            contact_phone: schema.contact_phone_column.clone(),
            log_phone: schema.log_phone_column.clone(),
        }
    }

    pub fn precomputed_from(schema: &LogMatchSchema) -> Self {
        Self::Precomputed {
            contact_key: schema.contact_key_column.clone(),
            log_key: schema.log_key_column.clone(),
        }
    }
}

/// Inputs for one matcher run.
#[derive(Debug, Clone)]
pub struct LogMatchOptions {
    pub contacts_path: PathBuf,
    pub log_path: PathBuf,
    pub output_dir: PathBuf,
    pub keys: JoinKeys,
    pub schema: LogMatchSchema,
}

impl LogMatchOptions {
    pub fn new(contacts_path: impl Into<PathBuf>, log_path: impl Into<PathBuf>) -> Self {
        let schema = LogMatchSchema::default();
        Self {
            contacts_path: contacts_path.into(),
            log_path: log_path.into(),
            output_dir: PathBuf::from("."),
            keys: JoinKeys::normalize_from(&schema),
            schema,
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: LogMatchSchema, precomputed_keys: bool) -> Self {
        self.keys = if precomputed_keys {
            JoinKeys::precomputed_from(&schema)
        } else {
            JoinKeys::normalize_from(&schema)
        };
        self.schema = schema;
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}

/// Outcome of a matcher run.
#[derive(Debug, Clone)]
pub struct LogMatchReport {
    pub contacts: usize,
    pub log_entries: usize,
    /// Contacts flagged as sent
    pub sent: usize,
    pub output_path: PathBuf,
}

impl LogMatchReport {
    pub fn summary(&self) -> String {
        format!(
            "Done! Output written to {} ({} of {} contacts sent, {} log entries)",
            self.output_path.display(),
            self.sent,
            self.contacts,
            self.log_entries
        )
    }
}

/// Flags every contact whose key maps to a sent status and writes the result.
///
/// # Errors
///
/// Returns [`ScrubError::MissingColumn`] when a key, phone or status column
/// is absent, [`ScrubError::Read`] for unreadable inputs, or an error if the
/// output cannot be written.
pub fn run_log_match(options: &LogMatchOptions) -> Result<LogMatchReport> {
    let schema = &options.schema;
    let contacts = clean_headers(load_csv(&options.contacts_path, CsvLoadOptions::strict())?)?;
    let log = clean_headers(load_csv(&options.log_path, CsvLoadOptions::strict())?)?;

    require_column(&log, &schema.status_column, &options.log_path)?;

    let (contacts, contact_key, log_keys) = match &options.keys {
        JoinKeys::Normalize {
            contact_phone,
            log_phone,
        } => {
            require_column(&contacts, contact_phone, &options.contacts_path)?;
            require_column(&log, log_phone, &options.log_path)?;
            let contacts = derive_text_column(
                contacts,
                contact_phone,
                &schema.contact_key_column,
                |value| Some(join_key(value)),
            )?;
            let log_keys: Vec<Option<String>> = text_values(&log, log_phone)?
                .into_iter()
                .map(|value| value.as_deref().map(join_key))
                .collect();
            (contacts, schema.contact_key_column.as_str(), log_keys)
        }
        JoinKeys::Precomputed {
            contact_key,
            log_key,
        } => {
            require_column(&contacts, contact_key, &options.contacts_path)?;
            require_column(&log, log_key, &options.log_path)?;
            (contacts, contact_key.as_str(), text_values(&log, log_key)?)
        }
    };

    let statuses = text_values(&log, &schema.status_column)?;
    let status_by_key = status_map(log_keys, statuses);
    let sent_statuses: Vec<String> = schema
        .sent_statuses
        .iter()
        .map(|status| status.to_lowercase())
        .collect();

    let flags: Vec<i32> = text_values(&contacts, contact_key)?
        .iter()
        .map(|key| {
            let sent = key
                .as_ref()
                .and_then(|key| status_by_key.get(key))
                .and_then(Option::as_deref)
                .is_some_and(|status| sent_statuses.contains(&status.to_lowercase()));
            i32::from(sent)
        })
        .collect();
    let sent = flags.iter().filter(|&&flag| flag == 1).count();

    let mut contacts = contacts;
    contacts.with_column(Series::new(schema.flag_column.as_str().into(), flags))?;
    let mut result = contacts.drop(contact_key)?;

    let output_path = options.output_dir.join(&schema.output_file);
    save_csv(&mut result, &output_path)?;

    Ok(LogMatchReport {
        contacts: result.height(),
        log_entries: log.height(),
        sent,
        output_path,
    })
}

/// Join key for a phone number: its ASCII digits, with the country code
/// removed from an 11-digit number that starts with `1`.
///
/// Unlike [`crate::scrub::normalize_phone`], a 10-digit number that happens
/// to start with `1` keeps that digit, so it still meets its `+1` form from
/// the log.
pub fn join_key(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    match digits.strip_prefix('1') {
        Some(rest) if digits.len() == 11 => rest.to_owned(),
        _ => digits,
    }
}

/// Maps each log key to its status. A later row overwrites an earlier one
/// with the same key; rows without a key are skipped.
fn status_map(
    keys: Vec<Option<String>>,
    statuses: Vec<Option<String>>,
) -> HashMap<String, Option<String>> {
    keys.into_iter()
        .zip(statuses)
        .filter_map(|(key, status)| key.map(|key| (key, status)))
        .collect()
}

fn require_column(df: &DataFrame, column: &str, file: &Path) -> Result<()> {
    if has_column(df, column) {
        Ok(())
    } else {
        Err(ScrubError::MissingColumn {
            column: column.to_owned(),
            file: file.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|&v| Some(v.to_owned())).collect()
    }

    #[test]
    fn test_join_key_strips_country_code_only_from_eleven_digits() {
        assert_eq!(join_key("+1 (123) 456-7890"), "1234567890");
        assert_eq!(join_key("1234567890"), "1234567890");
        assert_eq!(join_key("(555) 000-1111"), "5550001111");
        assert_eq!(join_key("12345"), "12345");
    }

    #[test]
    fn test_later_log_rows_win() {
        let map = status_map(
            some(&["5551234567", "5559990000", "5551234567"]),
            some(&["failed", "sent", "Delivered"]),
        );
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get("5551234567").cloned().flatten().as_deref(),
            Some("Delivered")
        );
    }

    #[test]
    fn test_rows_without_key_are_skipped() {
        let map = status_map(vec![None, Some("1".to_owned())], some(&["sent", "sent"]));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_schema_selects_key_source() {
        let schema = LogMatchSchema::default();
        let options = LogMatchOptions::new("a.csv", "b.csv").with_schema(schema.clone(), true);
        assert_eq!(
            options.keys,
            JoinKeys::Precomputed {
                contact_key: "To_norm".to_owned(),
                log_key: "Recipients".to_owned(),
            }
        );
        let options = options.with_schema(schema, false);
        assert!(matches!(options.keys, JoinKeys::Normalize { .. }));
    }
}
