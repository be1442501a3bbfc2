//! Transaction service
//!
//! Create, update, delete and query ledger records. Every mutation is
//! validated, saved and then announced on the storage change feed.

use chrono::NaiveDate;

use crate::error::{FintrackError, FintrackResult};
use crate::models::catalog;
use crate::models::{DateRange, Money, Transaction, TransactionId, TransactionType};
use crate::storage::{ChangeEvent, Storage};

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub range: Option<DateRange>,
    pub transaction_type: Option<TransactionType>,
    /// Exact category name
    pub category: Option<String>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub transaction_type: TransactionType,
    pub amount: Money,
    pub date: NaiveDate,
    pub category: String,
    pub description: Option<String>,
    pub subcategory: Option<String>,
    pub account: Option<String>,
    pub note: Option<String>,
}

/// Partial update; `None` leaves a field unchanged
///
/// The optional text fields use `Option<Option<_>>`: `Some(None)` clears the
/// field, `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub transaction_type: Option<TransactionType>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub subcategory: Option<Option<String>>,
    pub account: Option<Option<String>>,
    pub note: Option<Option<String>>,
}

impl TransactionUpdate {
    pub fn is_empty(&self) -> bool {
        self.transaction_type.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.subcategory.is_none()
            && self.account.is_none()
            && self.note.is_none()
    }
}

/// Trim, and treat blank as absent
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Log categories outside the built-in catalog; they are still accepted
pub(crate) fn note_unrecognized_category(txn: &Transaction) {
    if !catalog::is_recognized(txn.transaction_type, &txn.category) {
        tracing::warn!(
            category = %txn.category,
            transaction_type = %txn.transaction_type,
            "Category is not in the built-in catalog"
        );
    }
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new transaction
    pub fn create(&self, input: CreateTransactionInput) -> FintrackResult<Transaction> {
        let mut txn = Transaction::new(
            input.transaction_type,
            input.amount,
            input.category.trim(),
            input.date,
        );
        txn.description = input.description.unwrap_or_default().trim().to_string();
        txn.subcategory = clean(input.subcategory);
        txn.account = clean(input.account);
        txn.note = clean(input.note);

        txn.validate()?;
        note_unrecognized_category(&txn);

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;
        self.storage.changes.publish(ChangeEvent::Inserted(txn.id));

        tracing::info!(id = %txn.id, "Created transaction");
        Ok(txn)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> FintrackResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by full UUID, short display form or UUID prefix
    pub fn find(&self, identifier: &str) -> FintrackResult<Option<Transaction>> {
        if let Ok(id) = identifier.trim().parse::<TransactionId>() {
            return self.storage.transactions.get(id);
        }

        let mut matches = self.storage.transactions.find_by_prefix(identifier)?;
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(FintrackError::Validation(format!(
                "'{}' matches {} transactions; use more characters of the ID",
                identifier.trim(),
                n
            ))),
        }
    }

    /// Like `find`, but a missing transaction is an error
    pub fn resolve(&self, identifier: &str) -> FintrackResult<Transaction> {
        self.find(identifier)?
            .ok_or_else(|| FintrackError::transaction_not_found(identifier.trim()))
    }

    /// List transactions newest first, with optional filtering
    pub fn list(&self, filter: TransactionFilter) -> FintrackResult<Vec<Transaction>> {
        let mut transactions = self.storage.transactions.get_all()?;

        if let Some(range) = &filter.range {
            transactions.retain(|t| range.contains(t.date));
        }
        if let Some(transaction_type) = filter.transaction_type {
            transactions.retain(|t| t.transaction_type == transaction_type);
        }
        if let Some(category) = &filter.category {
            transactions.retain(|t| &t.category == category);
        }
        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// Apply a partial update; the ID never changes
    pub fn update(&self, id: TransactionId, update: TransactionUpdate) -> FintrackResult<Transaction> {
        let mut txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| FintrackError::transaction_not_found(id.to_string()))?;

        if update.is_empty() {
            return Ok(txn);
        }

        if let Some(transaction_type) = update.transaction_type {
            txn.transaction_type = transaction_type;
        }
        if let Some(amount) = update.amount {
            txn.amount = amount;
        }
        if let Some(date) = update.date {
            txn.date = date;
        }
        if let Some(category) = update.category {
            txn.category = category.trim().to_string();
        }
        if let Some(description) = update.description {
            txn.description = description.trim().to_string();
        }
        if let Some(subcategory) = update.subcategory {
            txn.subcategory = clean(subcategory);
        }
        if let Some(account) = update.account {
            txn.account = clean(account);
        }
        if let Some(note) = update.note {
            txn.note = clean(note);
        }

        txn.touch();
        txn.validate()?;
        note_unrecognized_category(&txn);

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;
        self.storage.changes.publish(ChangeEvent::Updated(txn.id));

        tracing::info!(id = %txn.id, "Updated transaction");
        Ok(txn)
    }

    /// Delete a transaction, returning the removed record
    pub fn delete(&self, id: TransactionId) -> FintrackResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .delete(id)?
            .ok_or_else(|| FintrackError::transaction_not_found(id.to_string()))?;

        self.storage.transactions.save()?;
        self.storage.changes.publish(ChangeEvent::Deleted(id));

        tracing::info!(id = %id, "Deleted transaction");
        Ok(txn)
    }

    pub fn count(&self) -> FintrackResult<usize> {
        self.storage.transactions.count()
    }
}
