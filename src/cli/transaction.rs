//! CLI commands for transaction management

use clap::Subcommand;

use super::{parse_date_arg, parse_type_arg, RangeArgs};
use crate::config::Settings;
use crate::display::{format_transaction_details, format_transaction_register};
use crate::error::{FintrackError, FintrackResult};
use crate::models::{Money, TransactionType};
use crate::services::{CreateTransactionInput, TransactionFilter, TransactionService, TransactionUpdate};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// Add a new transaction
    Add {
        /// income or expense
        #[arg(value_parser = parse_type_arg)]
        kind: TransactionType,
        /// Amount, e.g. 12.50 (always positive)
        amount: String,
        /// Category name
        category: String,
        /// Transaction date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(short = 'D', long)]
        description: Option<String>,
        /// Subcategory
        #[arg(long)]
        subcategory: Option<String>,
        /// Account label
        #[arg(short, long)]
        account: Option<String>,
        /// Free-form note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// List transactions, newest first
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        range: RangeArgs,
        /// Only this type
        #[arg(short = 't', long = "type", value_parser = parse_type_arg)]
        kind: Option<TransactionType>,
        /// Only this category (exact name)
        #[arg(short, long)]
        category: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show one transaction
    Show {
        /// Transaction ID (full UUID or txn- prefix)
        id: String,
    },

    /// Edit a transaction; pass an empty string to clear an optional field
    Edit {
        /// Transaction ID (full UUID or txn- prefix)
        id: String,
        #[arg(short = 't', long = "type", value_parser = parse_type_arg)]
        kind: Option<TransactionType>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'D', long)]
        description: Option<String>,
        #[arg(long)]
        subcategory: Option<String>,
        #[arg(short, long)]
        account: Option<String>,
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Delete a transaction
    #[command(alias = "rm")]
    Delete {
        /// Transaction ID (full UUID or txn- prefix)
        id: String,
    },
}

fn parse_amount_arg(s: &str) -> FintrackResult<Money> {
    Money::parse(s).map_err(|e| FintrackError::Validation(e.to_string()))
}

/// Handle transaction commands
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> FintrackResult<()> {
    let service = TransactionService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            kind,
            amount,
            category,
            date,
            description,
            subcategory,
            account,
            note,
        } => {
            let date = match date {
                Some(d) => parse_date_arg(&d, "transaction")?,
                None => chrono::Local::now().date_naive(),
            };

            let txn = service.create(CreateTransactionInput {
                transaction_type: kind,
                amount: parse_amount_arg(&amount)?,
                date,
                category,
                description,
                subcategory,
                account,
                note,
            })?;

            println!(
                "Added {} {} on {} ({}) [{}]",
                txn.transaction_type,
                txn.amount.format_with_symbol(symbol),
                txn.date,
                txn.category,
                txn.id
            );
        }

        TransactionCommands::List {
            range,
            kind,
            category,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if !range.is_empty() {
                filter = filter.range(range.resolve(settings)?);
            }
            if let Some(kind) = kind {
                filter = filter.transaction_type(kind);
            }
            if let Some(category) = category {
                filter = filter.category(category);
            }

            let transactions = service.list(filter)?;
            print!("{}", format_transaction_register(&transactions, symbol));
        }

        TransactionCommands::Show { id } => {
            let txn = service.resolve(&id)?;
            print!("{}", format_transaction_details(&txn, symbol));
        }

        TransactionCommands::Edit {
            id,
            kind,
            amount,
            category,
            date,
            description,
            subcategory,
            account,
            note,
        } => {
            let txn = service.resolve(&id)?;

            let update = TransactionUpdate {
                transaction_type: kind,
                amount: amount.as_deref().map(parse_amount_arg).transpose()?,
                date: date
                    .as_deref()
                    .map(|d| parse_date_arg(d, "transaction"))
                    .transpose()?,
                category,
                description,
                subcategory: subcategory.map(Some),
                account: account.map(Some),
                note: note.map(Some),
            };

            if update.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }

            let updated = service.update(txn.id, update)?;
            println!("Updated transaction {}", updated.id);
            print!("{}", format_transaction_details(&updated, symbol));
        }

        TransactionCommands::Delete { id } => {
            let txn = service.resolve(&id)?;
            let deleted = service.delete(txn.id)?;
            println!(
                "Deleted {} {} on {} ({})",
                deleted.transaction_type,
                deleted.amount.format_with_symbol(symbol),
                deleted.date,
                deleted.id
            );
        }
    }

    Ok(())
}
