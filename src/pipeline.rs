//! The four scrubbers, each a linear load → transform → write pipeline.
//!
//! # Overview
//!
//! - [`email`]: cleans a contact list for an email campaign
//! - [`sms`]: cleans a contact list for an SMS campaign and sets invalid rows aside
//! - [`log_match`]: flags contacts that a delivery log reports as sent
//! - [`partition`]: splits a list into duplicate, missing-id and clean rows
//!
//! # Example
//!
//! ```no_run
//! use contact_scrubber::pipeline::email::{EmailOptions, run_email_pipeline};
//! use std::path::Path;
//!
//! let options = EmailOptions::new(7, "Spring Outreach");
//! let report = run_email_pipeline(Path::new("contacts.csv"), Path::new("."), &options)?;
//! println!("{}", report.summary());
//! # Ok::<(), contact_scrubber::error::ScrubError>(())
//! ```

pub mod email;
pub mod log_match;
pub mod partition;
pub mod sms;

use std::path::PathBuf;

pub use email::{EmailOptions, run_email_pipeline};
pub use log_match::{JoinKeys, LogMatchOptions, LogMatchReport, run_log_match};
pub use partition::{PartitionOptions, PartitionReport, run_partition};
pub use sms::{SmsOptions, SmsReport, run_sms_pipeline};

/// Report generated after a scrubber writes its main output
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Number of rows read from the input
    pub rows_before: usize,

    /// Number of rows written
    pub rows_after: usize,

    /// Columns written, in output order
    pub columns: Vec<String>,

    /// Where the output was written
    pub output_path: PathBuf,

    /// Warnings raised while processing
    pub warnings: Vec<String>,

    /// Time taken for execution
    pub duration: std::time::Duration,
}

impl PipelineReport {
    /// Create a summary message
    pub fn summary(&self) -> String {
        format!(
            "CSV file processed and written to '{}': {} rows in, {} rows out, {:.2}s",
            self.output_path.display(),
            self.rows_before,
            self.rows_after,
            self.duration.as_secs_f64()
        )
    }

    /// The `Columns in output:` line printed after a run
    pub fn columns_line(&self) -> String {
        format!("Columns in output: {}", self.columns.join(", "))
    }
}
