//! fintrack - personal finance ledger with reporting
//!
//! This library provides the core functionality of the fintrack CLI: a local
//! JSON transaction ledger and the transaction aggregator that turns a
//! snapshot of it into totals, monthly buckets and category breakdowns.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, money, date ranges)
//! - `storage`: JSON file storage layer and change feed
//! - `services`: Ledger operations and import
//! - `reports`: The aggregator, dashboard and insights
//! - `live`: A dashboard that follows the change feed
//! - `export`: CSV, JSON and YAML export
//! - `display`: Terminal formatting helpers
//! - `cli`: Command handlers used by the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use fintrack::config::FintrackPaths;
//! use fintrack::models::DateRange;
//! use fintrack::reports::DashboardReport;
//! use fintrack::storage::Storage;
//!
//! let storage = Storage::open(FintrackPaths::new()?)?;
//! let snapshot = storage.transactions.get_all()?;
//! let report = DashboardReport::generate(&snapshot, DateRange::month(2024, 1)?);
//! print!("{}", report.format_terminal());
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod live;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

#[cfg(test)]
mod test_support;

pub use error::{FintrackError, FintrackResult};
