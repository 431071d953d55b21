//! Column schemas for every scrubber, loadable from JSON.
//!
//! The defaults reproduce the layouts the downstream import expects. A
//! config file only needs the fields it overrides:
//!
//! ```json
//! { "partition": { "id_column": "Member Number" } }
//! ```

use crate::error::{Result, ResultExt as _};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|&name| name.to_owned()).collect()
}

fn mapping(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|&(from, to)| (from.to_owned(), to.to_owned()))
        .collect()
}

/// Schema for the email-campaign scrubber.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EmailSchema {
    pub insert_group_column: String,
    pub group_name_column: String,
    /// Source column holding free-text birth dates
    pub dob_column: String,
    /// Source column holding the person identifier
    pub id_column: String,
    /// Birth-date column name after renaming, checked before writing
    pub output_dob_column: String,
    pub renames: HashMap<String, String>,
    pub output_columns: Vec<String>,
}

impl Default for EmailSchema {
    fn default() -> Self {
        Self {
            insert_group_column: "InsertGroup".to_owned(),
            group_name_column: "GroupName".to_owned(),
            dob_column: "Date of Birth".to_owned(),
            id_column: "person_id".to_owned(),
            output_dob_column: "DOB".to_owned(),
            renames: mapping(&[
                ("First Name", "first"),
                ("Last Name", "last"),
                ("Email", "Email"),
                ("Date of Birth", "DOB"),
                ("Person_id", "person_id"),
            ]),
            output_columns: owned(&[
                "InsertGroup",
                "GroupName",
                "person_id",
                "first",
                "last",
                "Email",
                "DOB",
            ]),
        }
    }
}

/// Schema for the SMS-campaign scrubber.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SmsSchema {
    pub insert_group_column: String,
    pub group_name_column: String,
    pub id_column: String,
    pub phone_column: String,
    pub dob_column: String,
    pub first_name_column: String,
    pub renames: HashMap<String, String>,
    pub output_columns: Vec<String>,
}

impl Default for SmsSchema {
    fn default() -> Self {
        Self {
            insert_group_column: "InsertGroup".to_owned(),
            group_name_column: "GroupName".to_owned(),
            id_column: "Person_id".to_owned(),
            phone_column: "Phone".to_owned(),
            dob_column: "Date of Birth".to_owned(),
            first_name_column: "First Name".to_owned(),
            renames: mapping(&[
                ("Medicaid Number", "mem_nbr"),
                ("Last Name", "last"),
                ("First Name", "first"),
                ("Person_id", "person_id"),
                ("Phone", "cell_phone"),
                ("Date of Birth", "DOB"),
            ]),
            output_columns: owned(&[
                "first",
                "last",
                "DOB",
                "cell_phone",
                "InsertGroup",
                "GroupName",
                "mem_nbr",
                "person_id",
            ]),
        }
    }
}

/// Schema for the delivery-log matcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogMatchSchema {
    /// Phone column on the contact list
    pub contact_phone_column: String,
    /// Recipient phone column on the delivery log
    pub log_phone_column: String,
    /// Helper join-key column on the contact list, dropped before writing
    pub contact_key_column: String,
    /// Precomputed join-key column on the delivery log
    pub log_key_column: String,
    pub status_column: String,
    pub flag_column: String,
    /// Statuses that count as sent, compared case-insensitively
    pub sent_statuses: Vec<String>,
    pub output_file: String,
}

impl Default for LogMatchSchema {
    fn default() -> Self {
        Self {
            contact_phone_column: "cell_phone".to_owned(),
            log_phone_column: "To".to_owned(),
            contact_key_column: "To_norm".to_owned(),
            log_key_column: "Recipients".to_owned(),
            status_column: "Status".to_owned(),
            flag_column: "f_sent".to_owned(),
            sent_statuses: owned(&["delivered", "sent"]),
            output_file: "result.csv".to_owned(),
        }
    }
}

/// Schema for the duplicate/missing-identifier partitioner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PartitionSchema {
    pub phone_column: String,
    pub id_column: String,
    pub duplicates_file: String,
    pub missing_id_file: String,
    pub unique_file: String,
}

impl Default for PartitionSchema {
    fn default() -> Self {
        Self {
            phone_column: "Phone".to_owned(),
            id_column: "Medicaid Number".to_owned(),
            duplicates_file: "duplicates.csv".to_owned(),
            missing_id_file: "noNumber.csv".to_owned(),
            unique_file: "unique_phones.csv".to_owned(),
        }
    }
}

/// All scrubber schemas.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScrubConfig {
    pub email: EmailSchema,
    pub sms: SmsSchema,
    pub log_match: LogMatchSchema,
    pub partition: PartitionSchema,
}

impl ScrubConfig {
    /// Load a config from a JSON file
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json(&content)
    }

    /// Parse a config from a JSON string
    ///
    /// # Errors
    ///
    /// Fails if `json` is not a valid config document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse scrubber config JSON")
    }

    /// Serialize to pretty JSON, e.g. to seed a config file
    ///
    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize scrubber config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() -> Result<()> {
        let config = ScrubConfig::from_json(r#"{ "partition": { "id_column": "Member Number" } }"#)?;
        assert_eq!(config.partition.id_column, "Member Number");
        assert_eq!(config.partition.phone_column, "Phone");
        assert_eq!(config.email, EmailSchema::default());
        Ok(())
    }

    #[test]
    fn test_round_trip_through_json() -> Result<()> {
        let config = ScrubConfig::default();
        assert_eq!(ScrubConfig::from_json(&config.to_json()?)?, config);
        Ok(())
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = ScrubConfig::from_json("{ not json").expect_err("must fail");
        assert!(err.to_string().contains("Failed to parse scrubber config JSON"));
    }
}
