//! Display formatting for terminal output

pub mod report;
pub mod transaction;

pub use report::{format_bar, format_percentage, share_of, truncate};
pub use transaction::{format_transaction_details, format_transaction_register};
