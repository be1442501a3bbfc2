//! JSON Export functionality
//!
//! Exports a transaction list inside a versioned envelope.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FintrackError, FintrackResult};
use crate::models::Transaction;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "2.0.0";

/// Transaction export envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub metadata: ExportMetadata,

    pub transactions: Vec<Transaction>,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub transaction_count: usize,

    /// Earliest transaction date
    pub earliest_transaction: Option<String>,

    /// Latest transaction date
    pub latest_transaction: Option<String>,
}

impl TransactionExport {
    /// Wrap a transaction list for export
    pub fn new(transactions: Vec<Transaction>) -> Self {
        let metadata = ExportMetadata {
            transaction_count: transactions.len(),
            earliest_transaction: transactions.iter().map(|t| t.date).min().map(|d| d.to_string()),
            latest_transaction: transactions.iter().map(|t| t.date).max().map(|d| d.to_string()),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            metadata,
            transactions,
        }
    }

    /// Check the envelope before its records are used
    pub fn validate(&self) -> Result<(), String> {
        let major = |v: &str| v.split('.').next().map(str::to_string);
        if major(&self.schema_version) != major(EXPORT_SCHEMA_VERSION) {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        if self.metadata.transaction_count != self.transactions.len() {
            return Err(format!(
                "Export claims {} transactions but contains {}",
                self.metadata.transaction_count,
                self.transactions.len()
            ));
        }

        Ok(())
    }
}

/// Export transactions to JSON
pub fn export_transactions_json<W: Write>(
    transactions: &[Transaction],
    writer: &mut W,
    pretty: bool,
) -> FintrackResult<()> {
    let export = TransactionExport::new(transactions.to_vec());

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| FintrackError::Export(e.to_string()))?;

    tracing::info!(count = transactions.len(), "Exported transactions to JSON");
    Ok(())
}

/// Read a JSON export back in
pub fn import_from_json(json_str: &str) -> FintrackResult<TransactionExport> {
    let export: TransactionExport =
        serde_json::from_str(json_str).map_err(|e| FintrackError::Import(e.to_string()))?;

    export.validate().map_err(FintrackError::Import)?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_ledger;

    #[test]
    fn test_export_envelope() {
        let export = TransactionExport::new(sample_ledger());

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.metadata.transaction_count, 10);
        assert_eq!(export.metadata.earliest_transaction.as_deref(), Some("2024-01-01"));
        assert_eq!(export.metadata.latest_transaction.as_deref(), Some("2024-01-25"));
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_json_export_reads_back() {
        let mut output = Vec::new();
        export_transactions_json(&sample_ledger(), &mut output, true).unwrap();

        let json_str = String::from_utf8(output).unwrap();
        assert!(json_str.contains("\"type\": \"income\""));

        let imported = import_from_json(&json_str).unwrap();
        assert_eq!(imported.transactions, sample_ledger());
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let mut export = TransactionExport::new(Vec::new());
        export.schema_version = "1.0.0".to_string();
        let json_str = serde_json::to_string(&export).unwrap();

        assert!(matches!(import_from_json(&json_str), Err(FintrackError::Import(_))));
    }
}
