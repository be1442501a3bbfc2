//! Core data models for fintrack
//!
//! Transactions and the value types the aggregator works with: money,
//! identifiers, date ranges and month keys.

pub mod catalog;
pub mod ids;
pub mod money;
pub mod month;
pub mod range;
pub mod transaction;

pub use catalog::CatalogCategory;
pub use ids::TransactionId;
pub use money::{Money, MoneyParseError};
pub use month::MonthKey;
pub use range::{DateRange, RangeKind, RangeParseError};
pub use transaction::{Transaction, TransactionType, TransactionTypeParseError};
