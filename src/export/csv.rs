//! CSV Export functionality
//!
//! Writes a transaction list as spreadsheet-compatible CSV. The column order
//! is fixed so the file re-imports through `services::import`.

use std::io::Write;

use crate::error::{FintrackError, FintrackResult};
use crate::models::Transaction;

/// Header row of a transaction export
pub const TRANSACTION_HEADER: &str = "Date,Type,Amount,Description,Category,Subcategory,Account,Note";

/// Export transactions to CSV in the order given
pub fn export_transactions_csv<W: Write>(
    transactions: &[Transaction],
    writer: &mut W,
) -> FintrackResult<()> {
    writeln!(writer, "{}", TRANSACTION_HEADER)
        .map_err(|e| FintrackError::Export(e.to_string()))?;

    for txn in transactions {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{}",
            txn.date,
            txn.transaction_type,
            txn.amount.to_decimal_string(),
            escape_csv(&txn.description),
            escape_csv(&txn.category),
            escape_csv(txn.subcategory.as_deref().unwrap_or("")),
            escape_csv(txn.account.as_deref().unwrap_or("")),
            escape_csv(txn.note.as_deref().unwrap_or(""))
        )
        .map_err(|e| FintrackError::Export(e.to_string()))?;
    }

    tracing::info!(count = transactions.len(), "Exported transactions to CSV");
    Ok(())
}

/// Quote a field containing a delimiter, quote or line break
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
