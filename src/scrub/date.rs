//! Birth-date normalization to `YYYY-MM-DD`.
//!
//! Free-text dates arrive in a handful of layouts. Three are recognized, tried
//! in a fixed order:
//!
//! 1. `YYYYMMDD` (exactly eight digits)
//! 2. `M/D/YYYY`
//! 3. `M/D/YY`, where a year that lands after the current year is moved back
//!    a century (`03/05/45` read in 2024 is 1945, not 2045)
//!
//! Anything after the first space is a time of day and is discarded. Year
//! `0000` is rejected in every layout.

use chrono::{Datelike as _, Local, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

static COMPACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})([0-9]{2})([0-9]{2})$").expect("compact date pattern is valid")
});

static SLASH_FULL_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{4})$").expect("slash date pattern is valid")
});

static SLASH_SHORT_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{2})$").expect("slash date pattern is valid")
});

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("iso date pattern is valid")
});

/// Two-digit years below this pivot belong to the 2000s, the rest to the 1900s.
const CENTURY_PIVOT: i32 = 69;

/// Prefix of the value written in place of a date that could not be parsed.
pub const DIAGNOSTIC_PREFIX: &str = "Invalid date format: Original String ";

/// What to write when a date cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFailurePolicy {
    /// Leave the cell empty.
    #[default]
    Null,
    /// Write [`DIAGNOSTIC_PREFIX`] followed by the original text, so the bad
    /// value survives into the output for review.
    Diagnostic,
}

/// Normalizes free-text dates, applying a failure policy to anything it
/// cannot read.
#[derive(Debug, Clone, Copy)]
pub struct DateNormalizer {
    current_year: i32,
    policy: DateFailurePolicy,
}

impl DateNormalizer {
    /// Creates a normalizer that resolves two-digit years against today's local year.
    pub fn new(policy: DateFailurePolicy) -> Self {
        Self {
            current_year: Local::now().year(),
            policy,
        }
    }

    /// Pins the year used to resolve two-digit years.
    #[must_use]
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    pub fn policy(&self) -> DateFailurePolicy {
        self.policy
    }

    /// Parses `raw` into a calendar date, or `None` if no layout matches.
    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        let text = strip_time(raw);

        if let Some(caps) = COMPACT.captures(text) {
            return ymd(&caps[1], &caps[2], &caps[3]);
        }

        if let Some(caps) = SLASH_FULL_YEAR.captures(text) {
            return ymd(&caps[3], &caps[1], &caps[2]);
        }

        let caps = SLASH_SHORT_YEAR.captures(text)?;
        let short: i32 = caps[3].parse().ok()?;
        let year = if short < CENTURY_PIVOT {
            2000 + short
        } else {
            1900 + short
        };
        let date = NaiveDate::from_ymd_opt(year, caps[1].parse().ok()?, caps[2].parse().ok()?)?;
        if date.year() > self.current_year {
            date.with_year(date.year() - 100)
        } else {
            Some(date)
        }
    }

    /// Renders `raw` as `YYYY-MM-DD`, or applies the failure policy.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        tracing::debug!(input = raw, "Processing date");
        if let Some(date) = self.parse(raw) {
            return Some(date.format("%Y-%m-%d").to_string());
        }

        let text = strip_time(raw);
        tracing::warn!(input = raw, "Could not parse date");
        match self.policy {
            DateFailurePolicy::Null => None,
            DateFailurePolicy::Diagnostic => Some(format!("{DIAGNOSTIC_PREFIX}{text}")),
        }
    }
}

/// Returns true when `value` already has the `YYYY-MM-DD` shape.
pub fn is_iso_date(value: &str) -> bool {
    ISO_DATE.is_match(value)
}

fn strip_time(raw: &str) -> &str {
    raw.split(' ').next().unwrap_or(raw)
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let year: i32 = year.parse().ok()?;
    if year < 1 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}
