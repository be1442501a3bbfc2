//! CLI command for exporting transactions

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use super::RangeArgs;
use crate::config::Settings;
use crate::error::{FintrackError, FintrackResult};
use crate::export::{export_transactions_csv, export_transactions_json, export_transactions_yaml};
use crate::services::{TransactionFilter, TransactionService};
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV, re-importable
    Csv,
    /// JSON envelope with metadata
    Json,
    /// YAML envelope, human-readable
    Yaml,
}

/// Arguments of the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file path
    pub output: PathBuf,

    /// Export format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: ExportFormat,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Handle the export command
///
/// Without range options every transaction is exported.
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    args: ExportArgs,
) -> FintrackResult<()> {
    let mut filter = TransactionFilter::new();
    if !args.range.is_empty() {
        filter = filter.range(args.range.resolve(settings)?);
    }
    let transactions = TransactionService::new(storage).list(filter)?;

    let file = File::create(&args.output).map_err(|e| {
        FintrackError::Export(format!(
            "Failed to create file {}: {}",
            args.output.display(),
            e
        ))
    })?;
    let mut writer = BufWriter::new(file);

    match args.format {
        ExportFormat::Csv => export_transactions_csv(&transactions, &mut writer)?,
        ExportFormat::Json => export_transactions_json(&transactions, &mut writer, args.pretty)?,
        ExportFormat::Yaml => export_transactions_yaml(&transactions, &mut writer)?,
    }
    writer
        .flush()
        .map_err(|e| FintrackError::Export(e.to_string()))?;

    println!(
        "Exported {} transaction(s) to: {}",
        transactions.len(),
        args.output.display()
    );

    Ok(())
}
