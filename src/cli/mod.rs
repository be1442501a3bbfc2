//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod categories;
pub mod export;
pub mod import;
pub mod report;
pub mod transaction;

pub use categories::handle_categories_command;
pub use export::{handle_export_command, ExportArgs, ExportFormat};
pub use import::{handle_import_command, ImportArgs};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{Datelike, Local, NaiveDate};
use clap::Args;

use crate::config::Settings;
use crate::error::{FintrackError, FintrackResult};
use crate::models::{DateRange, RangeKind, TransactionType};

/// Reporting range options shared by several commands
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// Period: a month ("2024-01") or "START..END"
    #[arg(short, long, conflicts_with_all = ["start", "end"])]
    pub period: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(short, long)]
    pub end: Option<String>,
}

impl RangeArgs {
    /// True when no range option was given
    pub fn is_empty(&self) -> bool {
        self.period.is_none() && self.start.is_none() && self.end.is_none()
    }

    /// Resolve to a range, falling back to the configured default
    pub fn resolve(&self, settings: &Settings) -> FintrackResult<DateRange> {
        self.resolve_at(settings, Local::now().date_naive())
    }

    fn resolve_at(&self, settings: &Settings, today: NaiveDate) -> FintrackResult<DateRange> {
        if let Some(period) = &self.period {
            return DateRange::parse(period).map_err(|e| {
                FintrackError::Validation(format!(
                    "Invalid period: {}. Use YYYY-MM or YYYY-MM-DD..YYYY-MM-DD",
                    e
                ))
            });
        }

        let month_start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);

        if self.start.is_some() || self.end.is_some() {
            let start = match &self.start {
                Some(s) => parse_date_arg(s, "start")?,
                None => month_start,
            };
            let end = match &self.end {
                Some(e) => parse_date_arg(e, "end")?,
                None => today,
            };
            return DateRange::custom(start, end);
        }

        match settings.default_range {
            RangeKind::Month => DateRange::month_of(today),
            RangeKind::Custom => DateRange::custom(month_start, today),
        }
    }
}

/// Parse a YYYY-MM-DD command-line date
pub fn parse_date_arg(s: &str, name: &str) -> FintrackResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        FintrackError::Validation(format!("Invalid {} date: {}. Use YYYY-MM-DD", name, s))
    })
}

/// clap value parser for transaction types
pub fn parse_type_arg(s: &str) -> Result<TransactionType, String> {
    s.parse::<TransactionType>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::date;

    fn args(period: Option<&str>, start: Option<&str>, end: Option<&str>) -> RangeArgs {
        RangeArgs {
            period: period.map(String::from),
            start: start.map(String::from),
            end: end.map(String::from),
        }
    }

    #[test]
    fn test_resolve_period() {
        let settings = Settings::default();
        let range = args(Some("2024-01"), None, None)
            .resolve_at(&settings, date(2025, 6, 3))
            .unwrap();
        assert_eq!(range, DateRange::month(2024, 1).unwrap());

        let range = args(Some("2024-01-10..2024-01-20"), None, None)
            .resolve_at(&settings, date(2025, 6, 3))
            .unwrap();
        assert_eq!(range.days(), 11);
    }

    #[test]
    fn test_resolve_start_end() {
        let settings = Settings::default();
        let range = args(None, Some("2025-05-20"), None)
            .resolve_at(&settings, date(2025, 6, 3))
            .unwrap();
        assert_eq!(range.start(), date(2025, 5, 20));
        assert_eq!(range.end(), date(2025, 6, 3));

        let err = args(None, Some("2025-06-20"), Some("2025-06-01"))
            .resolve_at(&settings, date(2025, 6, 3))
            .unwrap_err();
        assert!(matches!(err, FintrackError::InvalidRange { .. }));
    }

    #[test]
    fn test_resolve_default() {
        let mut settings = Settings::default();
        let today = date(2025, 6, 3);

        let range = args(None, None, None).resolve_at(&settings, today).unwrap();
        assert_eq!(range, DateRange::month(2025, 6).unwrap());

        settings.default_range = RangeKind::Custom;
        let range = args(None, None, None).resolve_at(&settings, today).unwrap();
        assert_eq!(range.start(), date(2025, 6, 1));
        assert_eq!(range.end(), today);
    }

    #[test]
    fn test_bad_inputs() {
        let settings = Settings::default();
        assert!(args(Some("2024-13"), None, None)
            .resolve_at(&settings, date(2025, 6, 3))
            .unwrap_err()
            .is_validation());
        assert!(parse_date_arg("01/02/2024", "start").is_err());
        assert!(parse_type_arg("investment").is_err());
        assert_eq!(parse_type_arg("Income").unwrap(), TransactionType::Income);
    }
}
