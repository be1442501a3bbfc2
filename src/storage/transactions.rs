//! Transaction repository for JSON storage
//!
//! Holds the ledger in memory behind a `RwLock` and persists it to
//! `data/transactions.json`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::FintrackError;
use crate::models::{Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

/// Current ledger file schema version
///
/// Version 2 dropped the `investment` transaction type.
pub const LEDGER_SCHEMA_VERSION: u32 = 2;

/// On-disk shape of the ledger file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LedgerFile {
    #[serde(default)]
    schema_version: u32,
    transactions: Vec<Transaction>,
}

/// Newest first: date descending, then creation time descending
fn snapshot_order(a: &Transaction, b: &Transaction) -> std::cmp::Ordering {
    b.date
        .cmp(&a.date)
        .then(b.created_at.cmp(&a.created_at))
        .then(a.id.cmp(&b.id))
}

/// Repository for transaction persistence
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load the ledger from disk, replacing whatever is in memory
    pub fn load(&self) -> Result<(), FintrackError> {
        let file: LedgerFile = read_json(&self.path)?;

        if file.schema_version > LEDGER_SCHEMA_VERSION {
            return Err(FintrackError::Storage(format!(
                "Ledger schema version {} is newer than supported version {}",
                file.schema_version, LEDGER_SCHEMA_VERSION
            )));
        }

        let mut data = self
            .data
            .write()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for txn in file.transactions {
            data.insert(txn.id, txn);
        }

        tracing::debug!(count = data.len(), path = %self.path.display(), "Loaded ledger");
        Ok(())
    }

    /// Save the ledger to disk
    pub fn save(&self) -> Result<(), FintrackError> {
        let file = LedgerFile {
            schema_version: LEDGER_SCHEMA_VERSION,
            transactions: self.get_all()?,
        };
        write_json_atomic(&self.path, &file)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, FintrackError> {
        let data = self
            .data
            .read()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    pub fn contains(&self, id: TransactionId) -> Result<bool, FintrackError> {
        let data = self
            .data
            .read()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.contains_key(&id))
    }

    /// Full snapshot, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, FintrackError> {
        let data = self
            .data
            .read()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(snapshot_order);
        Ok(transactions)
    }

    /// Insert or replace a transaction; returns true if it already existed
    pub fn upsert(&self, txn: Transaction) -> Result<bool, FintrackError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.insert(txn.id, txn).is_some())
    }

    /// Delete a transaction; returns the removed record
    pub fn delete(&self, id: TransactionId) -> Result<Option<Transaction>, FintrackError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id))
    }

    /// Every transaction whose ID starts with `fragment`
    pub fn find_by_prefix(&self, fragment: &str) -> Result<Vec<Transaction>, FintrackError> {
        let data = self
            .data
            .read()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut matches: Vec<_> = data
            .values()
            .filter(|t| t.id.matches_prefix(fragment))
            .cloned()
            .collect();
        matches.sort_by(snapshot_order);
        Ok(matches)
    }

    pub fn count(&self) -> Result<usize, FintrackError> {
        let data = self
            .data
            .read()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
