//! YAML Export functionality
//!
//! Same envelope as the JSON export, for human-readable backups.

use std::io::Write;

use crate::error::{FintrackError, FintrackResult};
use crate::export::json::TransactionExport;
use crate::models::Transaction;

/// Export transactions to YAML
pub fn export_transactions_yaml<W: Write>(
    transactions: &[Transaction],
    writer: &mut W,
) -> FintrackResult<()> {
    let export = TransactionExport::new(transactions.to_vec());
    let export_err = |e: std::io::Error| FintrackError::Export(e.to_string());

    writeln!(writer, "# fintrack transaction export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| FintrackError::Export(e.to_string()))?;

    tracing::info!(count = transactions.len(), "Exported transactions to YAML");
    Ok(())
}

/// Read a YAML export back in
pub fn import_from_yaml(yaml_str: &str) -> FintrackResult<TransactionExport> {
    let export: TransactionExport =
        serde_yaml::from_str(yaml_str).map_err(|e| FintrackError::Import(e.to_string()))?;

    export.validate().map_err(FintrackError::Import)?;

    Ok(export)
}
