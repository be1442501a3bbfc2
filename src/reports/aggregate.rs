//! Transaction aggregation
//!
//! Pure functions that turn a snapshot of transactions into the summary
//! values a dashboard needs: totals by type, a monthly series and an expense
//! breakdown by category. Nothing here is cached; callers recompute from the
//! full snapshot whenever it or the range changes.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::{DateRange, Money, MonthKey, Transaction, TransactionType};

/// Totals by transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub total_income: Money,
    pub total_expenses: Money,
    /// `total_income - total_expenses`
    pub net: Money,
}

/// Income and expense sums for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBucket {
    pub month: MonthKey,
    pub income: Money,
    pub expenses: Money,
}

impl MonthlyBucket {
    fn empty(month: MonthKey) -> Self {
        Self {
            month,
            income: Money::zero(),
            expenses: Money::zero(),
        }
    }

    /// Display label, e.g. "Jan 2024"
    pub fn label(&self) -> String {
        self.month.label()
    }

    pub fn net(&self) -> Money {
        self.income - self.expenses
    }
}

/// Expense sum for one category name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBucket {
    pub category: String,
    pub amount: Money,
}

/// Keep the transactions dated within `range` (inclusive), preserving order
pub fn filter_by_range(transactions: &[Transaction], range: &DateRange) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| range.contains(t.date))
        .cloned()
        .collect()
}

/// Sum amounts per type
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut summary = Summary::default();

    for txn in transactions {
        match txn.transaction_type {
            TransactionType::Income => summary.total_income += txn.amount,
            TransactionType::Expense => summary.total_expenses += txn.amount,
        }
    }

    summary.net = summary.total_income - summary.total_expenses;
    summary
}

/// Sum income and expenses per calendar month, oldest month first
///
/// Ordering depends only on the months present, never on input order.
pub fn bucket_by_month(transactions: &[Transaction]) -> Vec<MonthlyBucket> {
    let mut buckets: BTreeMap<MonthKey, MonthlyBucket> = BTreeMap::new();

    for txn in transactions {
        let key = MonthKey::of(txn.date);
        let bucket = buckets
            .entry(key)
            .or_insert_with(|| MonthlyBucket::empty(key));

        match txn.transaction_type {
            TransactionType::Income => bucket.income += txn.amount,
            TransactionType::Expense => bucket.expenses += txn.amount,
        }
    }

    buckets.into_values().collect()
}

/// Sum expense amounts per category, in order of first appearance
///
/// Category names are compared exactly (case-sensitive, untrimmed).
pub fn bucket_by_category(transactions: &[Transaction]) -> Vec<CategoryBucket> {
    let mut buckets: Vec<CategoryBucket> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for txn in transactions.iter().filter(|t| t.is_expense()) {
        match index.get(txn.category.as_str()) {
            Some(&i) => buckets[i].amount += txn.amount,
            None => {
                index.insert(txn.category.as_str(), buckets.len());
                buckets.push(CategoryBucket {
                    category: txn.category.clone(),
                    amount: txn.amount,
                });
            }
        }
    }

    buckets
}

/// The bucket with the largest amount; ties go to the earliest bucket
pub fn top_category(buckets: &[CategoryBucket]) -> Option<&CategoryBucket> {
    buckets.iter().fold(None, |best, bucket| match best {
        Some(current) if current.amount >= bucket.amount => Some(current),
        _ => Some(bucket),
    })
}
