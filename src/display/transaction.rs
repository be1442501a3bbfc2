//! Transaction display formatting
//!
//! Register tables and a detail view for the terminal.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::truncate;
use crate::models::Transaction;

const DESCRIPTION_WIDTH: usize = 28;

#[derive(Tabled)]
struct RegisterRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl RegisterRow {
    fn new(txn: &Transaction, currency_symbol: &str) -> Self {
        let category = match &txn.subcategory {
            Some(sub) => format!("{} / {}", txn.category, sub),
            None => txn.category.clone(),
        };

        Self {
            id: txn.id.to_string(),
            date: txn.date.format("%Y-%m-%d").to_string(),
            kind: txn.transaction_type.to_string(),
            amount: txn.signed_amount().format_with_symbol(currency_symbol),
            category,
            description: truncate(&txn.description, DESCRIPTION_WIDTH),
        }
    }
}

/// Format a list of transactions as a register table
pub fn format_transaction_register(transactions: &[Transaction], currency_symbol: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows: Vec<RegisterRow> = transactions
        .iter()
        .map(|t| RegisterRow::new(t, currency_symbol))
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    format!("{}\n", table)
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, currency_symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Full ID:     {}\n", txn.id.full()));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Type:        {}\n", txn.transaction_type));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!("Category:    {}\n", txn.category));

    if let Some(sub) = &txn.subcategory {
        output.push_str(&format!("Subcategory: {}\n", sub));
    }
    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }
    if let Some(account) = &txn.account {
        output.push_str(&format!("Account:     {}\n", account));
    }
    if let Some(note) = &txn.note {
        output.push_str(&format!("Note:        {}\n", note));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_ledger;

    #[test]
    fn test_register_table() {
        let ledger = sample_ledger();
        let output = format_transaction_register(&ledger[..3], "$");

        assert!(output.contains("Date"));
        assert!(output.contains("Salary / Regular Salary"));
        assert!(output.contains("$5000.00"));
        assert!(output.contains("-$1200.00"));
        assert!(output.contains(&ledger[0].id.to_string()));
    }

    #[test]
    fn test_empty_register() {
        assert_eq!(format_transaction_register(&[], "$"), "No transactions found.\n");
    }

    #[test]
    fn test_details() {
        let ledger = sample_ledger();
        let output = format_transaction_details(&ledger[0], "€");

        assert!(output.contains("Amount:      €5000.00"));
        assert!(output.contains("Note:        January salary payment"));
        assert!(output.contains("Account:     checking"));
    }
}
