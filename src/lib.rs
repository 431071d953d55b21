//! # contact-scrubber
//!
//! Cleans and reshapes CSV contact lists for email and SMS campaigns before
//! they are loaded into a downstream database or messaging platform.
//!
//! ## Quick Start
//!
//! ```no_run
//! use contact_scrubber::pipeline::sms::{SmsOptions, run_sms_pipeline};
//! use std::path::Path;
//!
//! let options = SmsOptions::new(12, "Fall Reminders");
//! let outcome = run_sms_pipeline(Path::new("contacts.csv"), Path::new("."), &options)?;
//! println!("{}", outcome.report.summary());
//! if let Some(side_file) = outcome.invalid_path {
//!     println!("{} rows set aside in {}", outcome.invalid_rows, side_file.display());
//! }
//! # Ok::<(), contact_scrubber::error::ScrubError>(())
//! ```
//!
//! ## Core Modules
//!
//! - [`scrub`]: per-value normalizers for identifiers, dates and phone numbers
//! - [`frame`]: CSV I/O and column helpers on Polars data frames
//! - [`pipeline`]: the email, SMS, log-matching and partitioning tools
//! - [`prompt`]: validated console input for the interactive scrubbers
//! - [`config`]: JSON-loadable column schemas
//! - [`error`]: error types and handling utilities
//! - [`logging`]: console and rotating-file logging
//!
//! ## Record Sets
//!
//! Every tool reads its input with schema inference disabled, so all columns
//! are text. Stages replace whole columns or build new frames; no stage
//! edits a row in place.

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod frame;
pub mod logging;
pub mod pipeline;
pub mod prompt;
pub mod scrub;
