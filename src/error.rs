//! Centralized error handling for the scrubbers.
//!
//! Library code returns [`ScrubError`] so callers can tell a bad input file
//! from a missing column or a closed prompt:
//!
//! ```
//! use contact_scrubber::error::ScrubError;
//!
//! fn describe(err: &ScrubError) -> &'static str {
//!     match err {
//!         ScrubError::Read { .. } => "could not read the input CSV",
//!         ScrubError::MissingColumn { .. } => "input is missing a required column",
//!         ScrubError::InputClosed => "no more console input",
//!         _ => "other failure",
//!     }
//! }
//! ```
//!
//! The `ResultExt` trait adds `.context()` to any `Result` whose error
//! converts into [`ScrubError`]:
//!
//! ```no_run
//! use contact_scrubber::error::ResultExt as _;
//!
//! fn load() -> contact_scrubber::error::Result<String> {
//!     std::fs::read_to_string("contacts.csv").context("Failed to load contact list")
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

/// Main error type for scrubber operations.
#[derive(Debug)]
pub enum ScrubError {
    /// I/O errors (file creation, console, etc.)
    Io(std::io::Error),

    /// The input CSV could not be read or parsed
    Read { path: PathBuf, message: String },

    /// Data processing errors raised by Polars
    DataProcessing(String),

    /// A column the pipeline cannot work without is absent
    MissingColumn { column: String, file: PathBuf },

    /// Configuration errors
    Config(String),

    /// Console input ended while a prompt was waiting
    InputClosed,

    /// Generic error with context
    Other(String),
}

impl fmt::Display for ScrubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Read { path, message } => {
                write!(f, "Error reading input file '{}': {message}", path.display())
            }
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::MissingColumn { column, file } => {
                write!(f, "Column '{column}' not found in '{}'", file.display())
            }
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::InputClosed => write!(f, "Input closed before a valid answer was given"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ScrubError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ScrubError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ScrubError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for ScrubError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

/// Result type alias for scrubber operations.
pub type Result<T> = std::result::Result<T, ScrubError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ScrubError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: ScrubError = e.into();
            ScrubError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: ScrubError = e.into();
            ScrubError::Other(format!("{}: {}", f(), err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScrubError::MissingColumn {
            column: "Status".to_owned(),
            file: PathBuf::from("log2.csv"),
        };
        assert_eq!(err.to_string(), "Column 'Status' not found in 'log2.csv'");
    }

    #[test]
    fn test_read_error_names_file() {
        let err = ScrubError::Read {
            path: PathBuf::from("contacts.csv"),
            message: "unexpected end of file".to_owned(),
        };
        assert!(err.to_string().contains("contacts.csv"));
        assert!(err.to_string().contains("unexpected end of file"));
    }

    #[test]
    fn test_library_conversions_stay_typed() {
        let json_err = serde_json::from_str::<u32>("x").expect_err("not a number");
        assert!(matches!(ScrubError::from(json_err), ScrubError::Config(_)));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(ScrubError::from(io_err), ScrubError::Io(_)));
    }

    #[test]
    fn test_result_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file.txt",
        ));

        let result: Result<()> = result.context("Failed to read file");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read file")
        );
    }
}
