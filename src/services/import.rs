//! Import service
//!
//! Turns CSV rows and JSON records into validated transactions. Every row
//! either becomes a transaction or a row error; nothing malformed reaches the
//! ledger. Imports go through a preview so duplicates can be reported before
//! anything is written.

use std::collections::{BTreeMap, HashSet};
use std::io::Read;

use chrono::NaiveDate;
use csv::{Reader, StringRecord};
use serde::Deserialize;

use crate::config::settings::LegacyTypePolicy;
use crate::error::{FintrackError, FintrackResult};
use crate::export::{import_from_json, import_from_yaml, TransactionExport};
use crate::models::{Money, Transaction, TransactionId, TransactionType, TransactionTypeParseError};
use crate::storage::{ChangeEvent, Storage};

use super::transaction::note_unrecognized_category;

/// Date formats tried after the configured one
const FALLBACK_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d"];

/// Column positions detected from a CSV header row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date_column: Option<usize>,
    pub type_column: Option<usize>,
    pub amount_column: Option<usize>,
    pub description_column: Option<usize>,
    pub category_column: Option<usize>,
    pub subcategory_column: Option<usize>,
    pub account_column: Option<usize>,
    pub note_column: Option<usize>,
    pub id_column: Option<usize>,
}

impl ColumnMapping {
    /// Detect columns by header name (case-insensitive)
    pub fn from_headers(headers: &StringRecord) -> Self {
        let mut mapping = Self::default();

        for (idx, header) in headers.iter().enumerate() {
            let h = header.trim().to_lowercase();

            let slot = match h.as_str() {
                "id" => &mut mapping.id_column,
                "date" | "transaction date" | "posted" => &mut mapping.date_column,
                "type" | "kind" => &mut mapping.type_column,
                "amount" => &mut mapping.amount_column,
                "subcategory" | "sub category" | "sub-category" => &mut mapping.subcategory_column,
                "category" => &mut mapping.category_column,
                "account" => &mut mapping.account_column,
                "note" | "notes" | "memo" => &mut mapping.note_column,
                _ if h.contains("description") || h.contains("payee") => {
                    &mut mapping.description_column
                }
                _ => continue,
            };

            if slot.is_none() {
                *slot = Some(idx);
            }
        }

        mapping
    }

    /// Names of required columns that were not found
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.date_column.is_none() {
            missing.push("date");
        }
        if self.type_column.is_none() {
            missing.push("type");
        }
        if self.amount_column.is_none() {
            missing.push("amount");
        }
        if self.category_column.is_none() {
            missing.push("category");
        }
        missing
    }
}

/// An untrusted record as it arrives from a file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub amount: RawAmount,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    pub date: String,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Amounts arrive as JSON numbers or as text
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(serde_json::Number),
    Text(String),
}

impl Default for RawAmount {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl RawAmount {
    fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// A validated row, tagged with where it came from
#[derive(Debug, Clone)]
pub struct ParsedTransaction {
    pub transaction: Transaction,
    /// 1-based record number in the source, excluding any header
    pub row_number: usize,
}

/// Status of a row in an import preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatus {
    /// Will be imported
    New,
    /// ID already in the ledger or earlier in the same file; skipped
    Duplicate,
    /// Malformed; never imported
    Error(String),
}

/// Preview entry for import review
#[derive(Debug, Clone)]
pub struct ImportPreviewEntry {
    pub row_number: usize,
    /// `None` for rows that failed to parse
    pub transaction: Option<Transaction>,
    pub status: ImportStatus,
}

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub duplicates_skipped: usize,
    pub errors: usize,
    pub imported_ids: Vec<TransactionId>,
    /// Error message per row number
    pub error_messages: BTreeMap<usize, String>,
}

type RowResult = (usize, Result<Transaction, String>);

/// Service for importing transactions
pub struct ImportService<'a> {
    storage: &'a Storage,
    legacy_policy: LegacyTypePolicy,
    date_format: String,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            legacy_policy: LegacyTypePolicy::default(),
            date_format: "%Y-%m-%d".to_string(),
        }
    }

    /// Treatment of records typed `investment`
    pub fn with_legacy_policy(mut self, policy: LegacyTypePolicy) -> Self {
        self.legacy_policy = policy;
        self
    }

    /// Date format tried before the fallbacks
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Parse CSV with a header row
    pub fn parse_csv_from_reader<R: Read>(
        &self,
        reader: &mut Reader<R>,
    ) -> FintrackResult<Vec<Result<ParsedTransaction, (usize, String)>>> {
        let headers = reader
            .headers()
            .map_err(|e| FintrackError::Import(format!("Could not read CSV header: {}", e)))?
            .clone();

        let mapping = ColumnMapping::from_headers(&headers);
        let missing = mapping.missing_required();
        if !missing.is_empty() {
            return Err(FintrackError::Import(format!(
                "CSV header is missing required column(s): {}",
                missing.join(", ")
            )));
        }

        let rows: Vec<RowResult> = reader
            .records()
            .enumerate()
            .map(|(idx, record)| {
                let row_number = idx + 1;
                let result = record
                    .map_err(|e| format!("Error reading CSV record: {}", e))
                    .and_then(|record| self.raw_from_record(&record, &mapping))
                    .and_then(|raw| self.validate_raw(raw));
                (row_number, result)
            })
            .collect();

        Ok(into_parsed(rows))
    }

    /// Parse JSON: a bare array of records or a fintrack export envelope
    pub fn parse_json(
        &self,
        json_str: &str,
    ) -> FintrackResult<Vec<Result<ParsedTransaction, (usize, String)>>> {
        let value: serde_json::Value = serde_json::from_str(json_str)
            .map_err(|e| FintrackError::Import(format!("Invalid JSON: {}", e)))?;

        let rows: Vec<RowResult> = match value {
            serde_json::Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| {
                    let result = serde_json::from_value::<RawTransaction>(item)
                        .map_err(|e| format!("Malformed record: {}", e))
                        .and_then(|raw| self.validate_raw(raw));
                    (idx + 1, result)
                })
                .collect(),
            serde_json::Value::Object(_) => envelope_rows(import_from_json(json_str)?),
            _ => {
                return Err(FintrackError::Import(
                    "Expected a JSON array of transactions or an export object".into(),
                ))
            }
        };

        Ok(into_parsed(rows))
    }

    /// Parse a fintrack YAML export
    pub fn parse_yaml(
        &self,
        yaml_str: &str,
    ) -> FintrackResult<Vec<Result<ParsedTransaction, (usize, String)>>> {
        Ok(into_parsed(envelope_rows(import_from_yaml(yaml_str)?)))
    }

    fn raw_from_record(
        &self,
        record: &StringRecord,
        mapping: &ColumnMapping,
    ) -> Result<RawTransaction, String> {
        let field = |col: Option<usize>| -> Option<String> {
            col.and_then(|c| record.get(c))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Ok(RawTransaction {
            id: field(mapping.id_column),
            transaction_type: field(mapping.type_column).unwrap_or_default(),
            amount: RawAmount::Text(field(mapping.amount_column).unwrap_or_default()),
            description: field(mapping.description_column),
            category: field(mapping.category_column).unwrap_or_default(),
            subcategory: field(mapping.subcategory_column),
            date: field(mapping.date_column).unwrap_or_default(),
            account: field(mapping.account_column),
            note: field(mapping.note_column),
        })
    }

    /// Validate one raw record into a transaction
    pub fn validate_raw(&self, raw: RawTransaction) -> Result<Transaction, String> {
        let transaction_type = self.parse_type(&raw.transaction_type)?;

        let amount_text = raw.amount.as_text();
        let amount = Money::parse(&amount_text)
            .map_err(|e| format!("Could not parse amount '{}': {}", amount_text, e))?;
        if amount.is_negative() {
            return Err(format!(
                "Amount must not be negative: '{}'",
                amount_text.trim()
            ));
        }

        let date = self.parse_date(raw.date.trim())?;

        let category = raw.category.trim();
        if category.is_empty() {
            return Err("Missing category".to_string());
        }

        let mut txn = Transaction::new(transaction_type, amount, category, date);
        if let Some(id) = raw.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            txn.id = TransactionId::from_external(id);
        }
        txn.description = raw.description.unwrap_or_default().trim().to_string();
        txn.subcategory = raw.subcategory.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        txn.account = raw.account.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        txn.note = raw.note.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        txn.validate().map_err(|e| e.to_string())?;
        Ok(txn)
    }

    fn parse_type(&self, s: &str) -> Result<TransactionType, String> {
        match s.parse::<TransactionType>() {
            Ok(t) => Ok(t),
            Err(TransactionTypeParseError::Legacy(name)) => match self.legacy_policy {
                LegacyTypePolicy::Expense => {
                    tracing::warn!(original_type = %name, "Migrating legacy record to expense");
                    Ok(TransactionType::Expense)
                }
                LegacyTypePolicy::Reject => Err(TransactionTypeParseError::Legacy(name).to_string()),
            },
            Err(e) => Err(e.to_string()),
        }
    }

    fn parse_date(&self, s: &str) -> Result<NaiveDate, String> {
        std::iter::once(self.date_format.as_str())
            .chain(FALLBACK_DATE_FORMATS.iter().copied())
            .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
            .ok_or_else(|| format!("Could not parse date: '{}'", s))
    }

    /// Mark each row as new, duplicate or error
    pub fn generate_preview(
        &self,
        parsed: Vec<Result<ParsedTransaction, (usize, String)>>,
    ) -> FintrackResult<Vec<ImportPreviewEntry>> {
        let mut seen: HashSet<TransactionId> = HashSet::new();
        let mut preview = Vec::with_capacity(parsed.len());

        for result in parsed {
            let entry = match result {
                Ok(parsed) => {
                    let id = parsed.transaction.id;
                    let status = if self.storage.transactions.contains(id)? || !seen.insert(id) {
                        ImportStatus::Duplicate
                    } else {
                        ImportStatus::New
                    };
                    ImportPreviewEntry {
                        row_number: parsed.row_number,
                        transaction: Some(parsed.transaction),
                        status,
                    }
                }
                Err((row_number, message)) => ImportPreviewEntry {
                    row_number,
                    transaction: None,
                    status: ImportStatus::Error(message),
                },
            };
            preview.push(entry);
        }

        Ok(preview)
    }

    /// Commit the `New` rows of a preview with a single save
    pub fn import_from_preview(&self, preview: &[ImportPreviewEntry]) -> FintrackResult<ImportResult> {
        let mut result = ImportResult::default();

        for entry in preview {
            match (&entry.status, &entry.transaction) {
                (ImportStatus::New, Some(txn)) => {
                    note_unrecognized_category(txn);
                    self.storage.transactions.upsert(txn.clone())?;
                    result.imported += 1;
                    result.imported_ids.push(txn.id);
                }
                (ImportStatus::Duplicate, _) => result.duplicates_skipped += 1,
                (ImportStatus::Error(message), _) => {
                    result.errors += 1;
                    result.error_messages.insert(entry.row_number, message.clone());
                }
                (ImportStatus::New, None) => {
                    result.errors += 1;
                    result
                        .error_messages
                        .insert(entry.row_number, "Row has no transaction".to_string());
                }
            }
        }

        if result.imported > 0 {
            self.storage.transactions.save()?;
            self.storage.changes.publish(ChangeEvent::Reloaded);
        }

        tracing::info!(
            imported = result.imported,
            duplicates = result.duplicates_skipped,
            errors = result.errors,
            "Import finished"
        );
        Ok(result)
    }
}

/// Rows of an already validated export; each record is still checked
fn envelope_rows(export: TransactionExport) -> Vec<RowResult> {
    export
        .transactions
        .into_iter()
        .enumerate()
        .map(|(idx, txn)| {
            let result = txn.validate().map(|_| txn).map_err(|e| e.to_string());
            (idx + 1, result)
        })
        .collect()
}

fn into_parsed(rows: Vec<RowResult>) -> Vec<Result<ParsedTransaction, (usize, String)>> {
    rows.into_iter()
        .map(|(row_number, result)| match result {
            Ok(transaction) => Ok(ParsedTransaction {
                transaction,
                row_number,
            }),
            Err(message) => {
                tracing::debug!(row = row_number, %message, "Rejected row");
                Err((row_number, message))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use crate::export::csv::export_transactions_csv;
    use crate::export::yaml::export_transactions_yaml;
    use crate::test_support::{date, sample_ledger};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn parse_csv(
        service: &ImportService,
        data: &str,
    ) -> FintrackResult<Vec<Result<ParsedTransaction, (usize, String)>>> {
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        service.parse_csv_from_reader(&mut reader)
    }

    #[test]
    fn test_detect_mapping() {
        let headers = StringRecord::from(vec![
            "Date", "Type", "Amount", "Description", "Category", "Subcategory", "Account", "Note",
        ]);
        let mapping = ColumnMapping::from_headers(&headers);

        assert_eq!(mapping.date_column, Some(0));
        assert_eq!(mapping.description_column, Some(3));
        assert_eq!(mapping.category_column, Some(4));
        assert_eq!(mapping.subcategory_column, Some(5));
        assert_eq!(mapping.note_column, Some(7));
        assert!(mapping.missing_required().is_empty());
    }

    #[test]
    fn test_missing_columns_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let err = parse_csv(&service, "Date,Amount\n2024-01-01,5\n").unwrap_err();
        assert!(err.to_string().contains("type, category"));
    }

    #[test]
    fn test_parse_csv_rows() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let data = "Date,Type,Amount,Description,Category\n\
                    2024-01-15,income,\"$5,000.00\",Monthly Salary,Salary\n\
                    01/10/2024,Expense,300,Grocery Shopping,Food\n\
                    2024-01-12,expense,abc,Gas,Transportation\n\
                    2024-13-40,expense,10,Bad date,Food\n\
                    2024-01-05,transfer,10,Unknown type,Food\n\
                    2024-01-05,expense,-10,Negative,Food\n\
                    2024-01-05,expense,10,No category,\n";

        let rows = parse_csv(&service, data).unwrap();
        assert_eq!(rows.len(), 7);

        let first = rows[0].as_ref().unwrap();
        assert_eq!(first.transaction.amount, Money::from_units(5000));
        assert_eq!(first.transaction.transaction_type, TransactionType::Income);

        let second = rows[1].as_ref().unwrap();
        assert_eq!(second.transaction.date, date(2024, 1, 10));
        assert_eq!(second.row_number, 2);

        let errors: Vec<_> = rows.iter().filter_map(|r| r.as_ref().err()).collect();
        assert_eq!(errors.len(), 5);
        assert!(errors[0].1.contains("amount"));
        assert!(errors[1].1.contains("date"));
        assert!(errors[2].1.contains("Unknown transaction type"));
        assert!(errors[3].1.contains("negative"));
        assert!(errors[4].1.contains("category"));
    }

    #[test]
    fn test_legacy_type_policy() {
        let (_temp_dir, storage) = create_test_storage();
        let data = "Date,Type,Amount,Category\n2024-01-20,investment,1000,Stocks\n";

        let rejecting = ImportService::new(&storage);
        let rows = parse_csv(&rejecting, data).unwrap();
        assert!(rows[0].as_ref().unwrap_err().1.contains("no longer supported"));

        let migrating = ImportService::new(&storage).with_legacy_policy(LegacyTypePolicy::Expense);
        let rows = parse_csv(&migrating, data).unwrap();
        let txn = &rows[0].as_ref().unwrap().transaction;
        assert_eq!(txn.transaction_type, TransactionType::Expense);
        assert_eq!(txn.amount, Money::from_units(1000));
    }

    #[test]
    fn test_parse_json_array() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let json = r#"[
            {"id": "1", "type": "income", "amount": 5000, "description": "Monthly Salary",
             "category": "Salary", "date": "2024-01-15"},
            {"id": "3", "type": "expense", "amount": "300.50", "category": "Food",
             "subcategory": "Groceries", "date": "2024-01-10"},
            {"type": "expense", "amount": 12.345, "category": "Food", "date": "2024-01-11"},
            {"type": "expense", "category": "Food", "date": "2024-01-11"}
        ]"#;

        let rows = service.parse_json(json).unwrap();
        assert_eq!(rows.len(), 4);

        let salary = &rows[0].as_ref().unwrap().transaction;
        assert_eq!(salary.id, TransactionId::from_external("1"));
        assert_eq!(salary.amount, Money::from_units(5000));

        let groceries = &rows[1].as_ref().unwrap().transaction;
        assert_eq!(groceries.amount, Money::from_cents(30050));
        assert_eq!(groceries.subcategory.as_deref(), Some("Groceries"));

        assert!(rows[2].is_err());
        assert_eq!(rows[3].as_ref().unwrap_err().0, 4);
    }

    #[test]
    fn test_parse_json_rejects_scalar() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);
        assert!(matches!(service.parse_json("42"), Err(FintrackError::Import(_))));
        assert!(matches!(service.parse_json("not json"), Err(FintrackError::Import(_))));
    }

    #[test]
    fn test_preview_and_import() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);
        let subscription = storage.subscribe();

        let json = r#"[
            {"id": "1", "type": "income", "amount": 5000, "category": "Salary", "date": "2024-01-15"},
            {"id": "1", "type": "income", "amount": 5000, "category": "Salary", "date": "2024-01-15"},
            {"id": "2", "type": "expense", "amount": 1200, "category": "Housing", "date": "2024-01-01"},
            {"id": "x", "type": "expense", "amount": 1, "category": "Food", "date": "not a date"}
        ]"#;

        let preview = service.generate_preview(service.parse_json(json).unwrap()).unwrap();
        let statuses: Vec<_> = preview.iter().map(|e| e.status.clone()).collect();
        assert_eq!(statuses[0], ImportStatus::New);
        assert_eq!(statuses[1], ImportStatus::Duplicate);
        assert_eq!(statuses[2], ImportStatus::New);
        assert!(matches!(statuses[3], ImportStatus::Error(_)));

        let result = service.import_from_preview(&preview).unwrap();
        assert_eq!(result.imported, 2);
        assert_eq!(result.duplicates_skipped, 1);
        assert_eq!(result.errors, 1);
        assert!(result.error_messages.contains_key(&4));
        assert_eq!(storage.transactions.count().unwrap(), 2);
        assert_eq!(subscription.drain(), vec![ChangeEvent::Reloaded]);

        // Importing the same file again only finds duplicates
        let preview = service.generate_preview(service.parse_json(json).unwrap()).unwrap();
        let result = service.import_from_preview(&preview).unwrap();
        assert_eq!(result.imported, 0);
        assert_eq!(result.duplicates_skipped, 3);
        assert!(subscription.drain().is_empty());
    }

    #[test]
    fn test_csv_export_reimports() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let mut output = Vec::new();
        export_transactions_csv(&sample_ledger(), &mut output).unwrap();
        let rows = parse_csv(&service, &String::from_utf8(output).unwrap()).unwrap();

        assert_eq!(rows.len(), 10);
        let imported: Vec<_> = rows.into_iter().map(|r| r.unwrap().transaction).collect();
        for (original, copy) in sample_ledger().iter().zip(&imported) {
            assert_eq!(original.date, copy.date);
            assert_eq!(original.amount, copy.amount);
            assert_eq!(original.category, copy.category);
            assert_eq!(original.note, copy.note);
        }
    }

    #[test]
    fn test_export_envelope_reimports() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let json = serde_json::to_string(&TransactionExport::new(sample_ledger())).unwrap();
        let rows = service.parse_json(&json).unwrap();

        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].as_ref().unwrap().transaction, sample_ledger()[0]);
    }

    #[test]
    fn test_envelope_with_wrong_count_is_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let mut export = TransactionExport::new(sample_ledger());
        export.metadata.transaction_count = 3;
        let json = serde_json::to_string(&export).unwrap();

        assert!(matches!(service.parse_json(&json), Err(FintrackError::Import(_))));
    }

    #[test]
    fn test_yaml_export_reimports() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let mut buffer = Vec::new();
        export_transactions_yaml(&sample_ledger(), &mut buffer).unwrap();
        let rows = service.parse_yaml(&String::from_utf8(buffer).unwrap()).unwrap();

        assert_eq!(rows.len(), 10);
        assert!(rows.iter().all(|r| r.is_ok()));

        let preview = service.generate_preview(rows).unwrap();
        let result = service.import_from_preview(&preview).unwrap();
        assert_eq!(result.imported, 10);
        assert_eq!(storage.transactions.count().unwrap(), 10);
    }
}
