//! Transaction model
//!
//! A single recorded money movement. The amount is always a non-negative
//! magnitude; whether it adds or removes money is carried by the type.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::TransactionId;
use super::money::Money;
use crate::error::{FintrackError, FintrackResult};

/// Kind of money movement
///
/// The set is closed: older ledgers also carried an `investment` kind, which
/// ingestion either rejects or migrates (see `LegacyTypePolicy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in
    Income,
    /// Money going out
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Amount with the sign implied by this type
    pub fn signed(&self, amount: Money) -> Money {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for type names outside the closed set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionTypeParseError {
    /// A kind from an earlier schema version (`investment`)
    Legacy(String),
    /// Anything else
    Unknown(String),
}

impl fmt::Display for TransactionTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy(s) => write!(f, "Transaction type '{}' is no longer supported", s),
            Self::Unknown(s) => write!(f, "Unknown transaction type: '{}'", s),
        }
    }
}

impl std::error::Error for TransactionTypeParseError {}

impl FromStr for TransactionType {
    type Err = TransactionTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "inflow" => Ok(Self::Income),
            "expense" | "outflow" => Ok(Self::Expense),
            "investment" => Err(TransactionTypeParseError::Legacy(s.trim().to_string())),
            _ => Err(TransactionTypeParseError::Unknown(s.trim().to_string())),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, stable for the record's lifetime
    pub id: TransactionId,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Non-negative magnitude
    pub amount: Money,

    #[serde(default)]
    pub description: String,

    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    /// Calendar date, no time component
    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction with a fresh ID
    pub fn new(
        transaction_type: TransactionType,
        amount: Money,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            transaction_type,
            amount,
            description: String::new(),
            category: category.into(),
            subcategory: None,
            date,
            account: None,
            note: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Shorthand for an income transaction
    pub fn income(amount: Money, category: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(TransactionType::Income, amount, category, date)
    }

    /// Shorthand for an expense transaction
    pub fn expense(amount: Money, category: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(TransactionType::Expense, amount, category, date)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// Amount with sign applied (expenses negative)
    pub fn signed_amount(&self) -> Money {
        self.transaction_type.signed(self.amount)
    }

    /// Mark the record as modified now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Validate the transaction
    pub fn validate(&self) -> FintrackResult<()> {
        if self.amount.is_negative() {
            return Err(FintrackError::Validation(format!(
                "Amount must not be negative (got {}); the type carries the direction",
                self.amount
            )));
        }

        if self.amount > Money::MAX_TRANSACTION {
            return Err(FintrackError::Validation(format!(
                "Amount {} exceeds the maximum of {}",
                self.amount,
                Money::MAX_TRANSACTION
            )));
        }

        if self.category.trim().is_empty() {
            return Err(FintrackError::Validation(
                "Category must not be empty".into(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} ({})",
            self.date, self.transaction_type, self.amount, self.category, self.id
        )
    }
}
