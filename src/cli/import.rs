//! CLI command handler for transaction import
//!
//! Reads CSV, JSON or YAML, shows a preview with per-row status and commits
//! the new rows unless `--dry-run` is given.

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};

use crate::config::Settings;
use crate::error::{FintrackError, FintrackResult};
use crate::services::{ImportService, ImportStatus};
use crate::storage::Storage;

/// Input formats accepted by `import`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportFormat {
    /// CSV with a header row
    Csv,
    /// JSON array of records, or a fintrack JSON export
    Json,
    /// fintrack YAML export
    Yaml,
}

impl ImportFormat {
    /// Guess from the file extension
    pub fn detect(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Arguments of the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// File to import
    pub file: PathBuf,

    /// Input format (detected from the extension when omitted)
    #[arg(short, long, value_enum)]
    pub format: Option<ImportFormat>,

    /// Show the preview without saving anything
    #[arg(long)]
    pub dry_run: bool,
}

fn read_file(path: &Path) -> FintrackResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| FintrackError::Import(format!("Failed to read file: {}", e)))
}

/// Handle the import command
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    args: ImportArgs,
) -> FintrackResult<()> {
    let path = args.file.as_path();
    if !path.exists() {
        return Err(FintrackError::Import(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let format = args
        .format
        .or_else(|| ImportFormat::detect(path))
        .ok_or_else(|| {
            FintrackError::Import(format!(
                "Cannot tell the format of {}; pass --format csv, json or yaml",
                path.display()
            ))
        })?;

    let service = ImportService::new(storage)
        .with_legacy_policy(settings.legacy_type_policy)
        .with_date_format(settings.date_format.clone());

    let parsed = match format {
        ImportFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(true)
                .flexible(true)
                .trim(csv::Trim::All)
                .from_path(path)
                .map_err(|e| FintrackError::Import(format!("Failed to read file: {}", e)))?;
            service.parse_csv_from_reader(&mut reader)?
        }
        ImportFormat::Json => service.parse_json(&read_file(path)?)?,
        ImportFormat::Yaml => service.parse_yaml(&read_file(path)?)?,
    };

    if parsed.is_empty() {
        println!("No transactions found in {}.", path.display());
        return Ok(());
    }

    let preview = service.generate_preview(parsed)?;

    let new_count = preview.iter().filter(|e| e.status == ImportStatus::New).count();
    let dup_count = preview
        .iter()
        .filter(|e| e.status == ImportStatus::Duplicate)
        .count();
    let err_count = preview
        .iter()
        .filter(|e| matches!(e.status, ImportStatus::Error(_)))
        .count();

    println!("Import Preview for '{}'", path.display());
    println!("{}", "=".repeat(40));
    println!("  New transactions:   {}", new_count);
    println!("  Duplicates (skip):  {}", dup_count);
    println!("  Errors:             {}", err_count);

    if err_count > 0 {
        println!();
        println!("Rejected rows:");
        for entry in &preview {
            if let ImportStatus::Error(message) = &entry.status {
                println!("  row {}: {}", entry.row_number, message);
            }
        }
    }

    if args.dry_run {
        println!();
        println!("Dry run: nothing was imported.");
        return Ok(());
    }

    if new_count == 0 {
        println!();
        println!("No new transactions to import.");
        return Ok(());
    }

    let result = service.import_from_preview(&preview)?;

    println!();
    println!("Import complete:");
    println!("  Imported:  {}", result.imported);
    println!("  Skipped:   {}", result.duplicates_skipped);
    println!("  Errors:    {}", result.errors);

    Ok(())
}
