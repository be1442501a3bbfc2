//! CLI command listing recognized categories

use crate::models::catalog::categories_for;
use crate::models::TransactionType;

/// Print the recognized categories, optionally for one type only
pub fn handle_categories_command(kind: Option<TransactionType>) {
    print!("{}", format_catalog(kind));
}

fn format_catalog(kind: Option<TransactionType>) -> String {
    let kinds = match kind {
        Some(kind) => vec![kind],
        None => vec![TransactionType::Income, TransactionType::Expense],
    };

    let mut output = String::new();
    for kind in kinds {
        output.push_str(&format!("{} categories:\n", kind));
        for category in categories_for(kind) {
            output.push_str(&format!(
                "  {:<16} {}\n",
                category.name,
                category.subcategories.join(", ")
            ));
        }
        output.push('\n');
    }
    output
}
