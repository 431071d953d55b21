//! Validated console input.
//!
//! [`prompt_until`] asks a question until the answer passes a parser. It is
//! generic over the reader and writer, so tests drive it with in-memory
//! buffers instead of a terminal.

use crate::error::{Result, ScrubError};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Writes `message`, reads one line and hands it to `parse`.
///
/// When `parse` returns `Err(reason)`, `reason` is printed and the question
/// is asked again. There is no retry limit.
///
/// # Errors
///
/// Returns [`ScrubError::InputClosed`] if the reader hits end of input, or an
/// I/O error if reading or writing fails.
pub fn prompt_until<R, W, T, F>(reader: &mut R, writer: &mut W, message: &str, parse: F) -> Result<T>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> std::result::Result<T, String>,
{
    loop {
        write!(writer, "{message}")?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(ScrubError::InputClosed);
        }
        let answer = line.trim_end_matches(['\r', '\n']);

        match parse(answer) {
            Ok(value) => return Ok(value),
            Err(reason) => writeln!(writer, "{reason}")?,
        }
    }
}

/// Accepts an existing file whose name ends in `.csv` (any case).
///
/// # Errors
///
/// Returns the retry message shown to the operator.
pub fn parse_csv_path(answer: &str) -> std::result::Result<PathBuf, String> {
    let candidate = answer.trim();
    let is_csv = candidate.to_lowercase().ends_with(".csv");
    if is_csv && Path::new(candidate).is_file() {
        Ok(PathBuf::from(candidate))
    } else {
        Err("Invalid file. Please ensure the file exists and has a '.csv' extension.".to_owned())
    }
}

/// Accepts a whole number, surrounding whitespace allowed.
///
/// # Errors
///
/// Returns the retry message shown to the operator.
pub fn parse_group_number(answer: &str) -> std::result::Result<i64, String> {
    answer.trim().parse().map_err(|_err| {
        "Invalid input. Please enter a valid number for the Insert Group Number.".to_owned()
    })
}

/// Accepts any text as a group name.
///
/// # Errors
///
/// Never fails; the signature matches the other validators.
pub fn parse_group_name(answer: &str) -> std::result::Result<String, String> {
    Ok(answer.to_owned())
}
