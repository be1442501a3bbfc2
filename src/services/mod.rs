//! Service layer for fintrack
//!
//! Validation and persistence rules on top of the storage layer.

pub mod import;
pub mod transaction;

pub use import::{ColumnMapping, ImportPreviewEntry, ImportResult, ImportService, ImportStatus};
pub use transaction::{
    CreateTransactionInput, TransactionFilter, TransactionService, TransactionUpdate,
};
