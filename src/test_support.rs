//! Shared fixtures for unit tests

use chrono::{NaiveDate, TimeZone, Utc};

use crate::models::{Money, Transaction, TransactionId, TransactionType};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: &str,
    transaction_type: TransactionType,
    units: i64,
    description: &str,
    category: &str,
    subcategory: &str,
    account: &str,
    day: u32,
) -> Transaction {
    let mut txn = Transaction::new(
        transaction_type,
        Money::from_units(units),
        category,
        date(2024, 1, day),
    )
    .with_description(description)
    .with_subcategory(subcategory)
    .with_account(account);
    txn.id = TransactionId::from_external(id);
    txn.created_at = Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap();
    txn.updated_at = txn.created_at;
    txn
}

/// The ten-record January 2024 ledger used throughout the tests
pub fn sample_ledger() -> Vec<Transaction> {
    use TransactionType::{Expense, Income};

    vec![
        sample("1", Income, 5000, "Monthly Salary", "Salary", "Regular Salary", "checking", 15)
            .with_note("January salary payment"),
        sample("2", Expense, 1200, "Monthly Rent", "Housing", "Rent", "checking", 1),
        sample("3", Expense, 300, "Grocery Shopping", "Food", "Groceries", "credit-card", 10),
        sample("4", Expense, 1000, "S&P 500 ETF", "Savings", "ETFs", "investment", 20),
        sample("5", Expense, 80, "Gas Station", "Transportation", "Gas", "credit-card", 12),
        sample("6", Income, 500, "Freelance Project", "Business", "Freelance", "checking", 25),
        sample("7", Expense, 150, "Internet & Phone", "Housing", "Utilities", "checking", 5),
        sample("8", Expense, 45, "Restaurant Dinner", "Food", "Restaurants", "credit-card", 18),
        sample("9", Expense, 500, "401k Contribution", "Savings", "401k", "investment", 15),
        sample("10", Expense, 25, "Coffee & Snacks", "Food", "Coffee", "cash", 22),
    ]
}
