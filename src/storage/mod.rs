//! Storage layer for fintrack
//!
//! JSON file storage with atomic writes plus a change feed that announces
//! every committed mutation.

pub mod events;
pub mod file_io;
pub mod transactions;

pub use events::{ChangeEvent, ChangeFeed, Subscription};
pub use file_io::{read_json, write_json_atomic};
pub use transactions::{TransactionRepository, LEDGER_SCHEMA_VERSION};

use crate::config::paths::FintrackPaths;
use crate::error::FintrackError;

/// Main storage coordinator
pub struct Storage {
    paths: FintrackPaths,
    pub transactions: TransactionRepository,
    pub changes: ChangeFeed,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: FintrackPaths) -> Result<Self, FintrackError> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            changes: ChangeFeed::new(),
            paths,
        })
    }

    /// Open storage and load the ledger
    pub fn open(paths: FintrackPaths) -> Result<Self, FintrackError> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &FintrackPaths {
        &self.paths
    }

    pub fn load_all(&self) -> Result<(), FintrackError> {
        self.transactions.load()
    }

    pub fn save_all(&self) -> Result<(), FintrackError> {
        self.transactions.save()
    }

    /// Subscribe to committed changes
    pub fn subscribe(&self) -> Subscription {
        self.changes.subscribe()
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }
}
