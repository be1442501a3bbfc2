//! Reporting date range
//!
//! An inclusive start/end pair, either a whole calendar month or an explicit
//! custom pair. A range whose start is after its end cannot be constructed.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::month::MonthKey;
use crate::error::{FintrackError, FintrackResult};

/// How a range was selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RangeKind {
    /// A whole calendar month
    #[default]
    Month,
    /// An explicit start/end pair
    Custom,
}

/// Inclusive date range used to filter transactions for a reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
    kind: RangeKind,
}

impl DateRange {
    /// The whole of a calendar month
    pub fn month(year: i32, month: u32) -> FintrackResult<Self> {
        let key = MonthKey::new(year, month)
            .ok_or_else(|| FintrackError::Validation(format!("Invalid month: {}", month)))?;
        Self::for_month(key)
    }

    /// The whole of the month identified by `key`
    pub fn for_month(key: MonthKey) -> FintrackResult<Self> {
        let (start, end) = key
            .first_day()
            .zip(key.last_day())
            .ok_or_else(|| FintrackError::Validation(format!("Month out of range: {}", key)))?;

        Ok(Self {
            start,
            end,
            kind: RangeKind::Month,
        })
    }

    /// The month containing `date`
    pub fn month_of(date: NaiveDate) -> FintrackResult<Self> {
        Self::month(date.year(), date.month())
    }

    /// An explicit inclusive pair
    ///
    /// # Errors
    ///
    /// Returns [`FintrackError::InvalidRange`] if `start > end`.
    pub fn custom(start: NaiveDate, end: NaiveDate) -> FintrackResult<Self> {
        if start > end {
            return Err(FintrackError::InvalidRange { start, end });
        }

        Ok(Self {
            start,
            end,
            kind: RangeKind::Custom,
        })
    }

    /// The current calendar month in local time
    pub fn current_month() -> FintrackResult<Self> {
        Self::month_of(chrono::Local::now().date_naive())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn kind(&self) -> RangeKind {
        self.kind
    }

    /// Check if a date falls within this range (both ends inclusive)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days covered, counting both ends
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Parse a range string
    ///
    /// Formats:
    /// - Month: "2024-01"
    /// - Custom: "2024-01-10..2024-01-20"
    pub fn parse(s: &str) -> Result<Self, RangeParseError> {
        let s = s.trim();

        if let Some((start, end)) = s.split_once("..") {
            let start = parse_date(start).ok_or_else(|| RangeParseError::InvalidFormat(s.into()))?;
            let end = parse_date(end).ok_or_else(|| RangeParseError::InvalidFormat(s.into()))?;
            return Self::custom(start, end).map_err(|_| RangeParseError::Inverted(s.into()));
        }

        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| RangeParseError::InvalidFormat(s.into()))?;
        let year: i32 = year
            .parse()
            .map_err(|_| RangeParseError::InvalidFormat(s.into()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| RangeParseError::InvalidFormat(s.into()))?;

        if !(1..=12).contains(&month) {
            return Err(RangeParseError::InvalidMonth(month));
        }

        Self::month(year, month).map_err(|_| RangeParseError::InvalidFormat(s.into()))
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            RangeKind::Month => write!(f, "{}", MonthKey::of(self.start)),
            RangeKind::Custom => write!(f, "{} to {}", self.start, self.end),
        }
    }
}

#[derive(Deserialize)]
struct RawRange {
    start: NaiveDate,
    end: NaiveDate,
    #[serde(default)]
    kind: Option<RangeKind>,
}

// Deserialization goes through the constructors so the start <= end invariant
// also holds for ranges read from files.
impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawRange::deserialize(deserializer)?;
        let mut range = Self::custom(raw.start, raw.end).map_err(serde::de::Error::custom)?;
        range.kind = raw.kind.unwrap_or(RangeKind::Custom);
        Ok(range)
    }
}

/// Error type for range parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
    Inverted(String),
}

impl fmt::Display for RangeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeParseError::InvalidFormat(s) => write!(f, "Invalid period format: {}", s),
            RangeParseError::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
            RangeParseError::Inverted(s) => write!(f, "Range start is after its end: {}", s),
        }
    }
}

impl std::error::Error for RangeParseError {}
