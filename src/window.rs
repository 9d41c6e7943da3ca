//! Time windows for "changes in the last N units" queries.
//!
//! Durations are written as a count followed by a unit, e.g. `24Hours`,
//! `2Days`, `120Minutes` or `1Month`. Matching is case-insensitive. Unit
//! keywords are checked in the order minutes, hours, days, months.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};

use crate::error::{GerritError, Result};

/// Unit of a [`Lookback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Minutes,
    Hours,
    Days,
    /// Calendar months.
    Months,
}

impl DurationUnit {
    /// Keywords in match order; each unit accepts its plural and singular form.
    const KEYWORDS: [(DurationUnit, &'static str, &'static str); 4] = [
        (DurationUnit::Minutes, "minutes", "minute"),
        (DurationUnit::Hours, "hours", "hour"),
        (DurationUnit::Days, "days", "day"),
        (DurationUnit::Months, "months", "month"),
    ];

    fn from_keyword(keyword: &str) -> Option<Self> {
        Self::KEYWORDS
            .iter()
            .find(|(_, plural, singular)| keyword == *plural || keyword == *singular)
            .map(|(unit, _, _)| *unit)
    }

    fn name(self) -> &'static str {
        match self {
            DurationUnit::Minutes => "Minutes",
            DurationUnit::Hours => "Hours",
            DurationUnit::Days => "Days",
            DurationUnit::Months => "Months",
        }
    }
}

/// A parsed duration such as `24Hours`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookback {
    pub amount: u32,
    pub unit: DurationUnit,
}

impl Lookback {
    pub fn new(amount: u32, unit: DurationUnit) -> Self {
        Self { amount, unit }
    }

    /// The instant `self` before `stop`.
    ///
    /// # Errors
    ///
    /// Returns an error if the result is outside chrono's representable range.
    pub fn before(&self, stop: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let amount = i64::from(self.amount);
        let start = match self.unit {
            DurationUnit::Minutes => stop.checked_sub_signed(Duration::minutes(amount)),
            DurationUnit::Hours => stop.checked_sub_signed(Duration::hours(amount)),
            DurationUnit::Days => stop.checked_sub_signed(Duration::days(amount)),
            DurationUnit::Months => stop.checked_sub_months(Months::new(self.amount)),
        };
        start.ok_or_else(|| GerritError::InvalidDuration {
            input: self.to_string(),
            reason: "out of range".to_string(),
        })
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.name())
    }
}

impl FromStr for Lookback {
    type Err = GerritError;

    fn from_str(input: &str) -> Result<Self> {
        let invalid = |reason: &str| GerritError::InvalidDuration {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let normalized = input.trim().to_lowercase();
        let digits_end = normalized
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(normalized.len());
        let (digits, keyword) = normalized.split_at(digits_end);

        if digits.is_empty() {
            return Err(invalid("missing number before the unit"));
        }
        let amount = digits
            .parse::<u32>()
            .map_err(|_| invalid("number is too large"))?;

        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(invalid("missing unit (use Minutes, Hours, Days or Months)"));
        }
        let unit = DurationUnit::from_keyword(keyword)
            .ok_or_else(|| invalid("unknown unit (use Minutes, Hours, Days or Months)"))?;

        Ok(Self { amount, unit })
    }
}

/// A closed time range `[start, stop]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
}

impl Window {
    /// The window of length `lookback` ending at `stop`.
    ///
    /// # Errors
    ///
    /// Returns an error if the start instant cannot be represented.
    pub fn ending_at(stop: DateTime<Utc>, lookback: Lookback) -> Result<Self> {
        Ok(Self {
            start: lookback.before(stop)?,
            stop,
        })
    }

    /// Parse `duration` and build the window ending at `stop`.
    ///
    /// # Errors
    ///
    /// Returns [`GerritError::InvalidDuration`] for malformed durations.
    pub fn parse(duration: &str, stop: DateTime<Utc>) -> Result<Self> {
        Self::ending_at(stop, duration.parse()?)
    }

    /// `start` in the format Gerrit's `after:` operator accepts.
    pub fn gerrit_start(&self) -> String {
        format_gerrit_timestamp(self.start)
    }
}

/// Format an instant as `YYYY-MM-DD HH:MM:SS.mmm` (UTC).
pub fn format_gerrit_timestamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}
