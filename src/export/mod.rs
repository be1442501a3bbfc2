//! Export module for fintrack
//!
//! Writes transaction lists in three formats:
//! - CSV: fixed column order, spreadsheet-compatible and re-importable
//! - JSON: versioned envelope for machine consumers and backups
//! - YAML: the same envelope, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{escape_csv, export_transactions_csv, TRANSACTION_HEADER};
pub use json::{export_transactions_json, import_from_json, TransactionExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_transactions_yaml, import_from_yaml};
