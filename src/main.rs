use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use fintrack::cli::{
    handle_categories_command, handle_export_command, handle_import_command,
    handle_report_command, handle_transaction_command, parse_type_arg, ExportArgs, ImportArgs,
    ReportCommands, TransactionCommands,
};
use fintrack::config::{FintrackPaths, Settings};
use fintrack::models::TransactionType;
use fintrack::storage::Storage;

#[derive(Parser)]
#[command(
    name = "fintrack",
    author = "Kaylee Beyene",
    version,
    about = "Personal finance ledger with monthly and category reporting",
    long_about = "fintrack records income and expenses in a local JSON ledger and \
                  reports totals, monthly trends, category breakdowns and savings \
                  insights for any month or date range."
)]
struct Cli {
    /// Log level, used when RUST_LOG is not set
    #[arg(long, global = true, default_value_t = LevelFilter::WARN)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and settings
    Init,

    /// Show current configuration and paths
    Config,

    /// Transaction management commands
    #[command(subcommand, alias = "transaction")]
    Txn(TransactionCommands),

    /// Import transactions from CSV, JSON or YAML
    Import(ImportArgs),

    /// Reports over a month or date range
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export transactions to a file
    Export(ExportArgs),

    /// List recognized categories
    Categories {
        /// Only this type
        #[arg(short = 't', long = "type", value_parser = parse_type_arg)]
        kind: Option<TransactionType>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level);
    debug!("Log level set to {}", cli.log_level.to_string().to_lowercase());

    let paths = FintrackPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing fintrack at: {}", paths.base_dir().display());
            let storage = Storage::open(paths.clone())?;
            storage.save_all()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'fintrack txn add expense 12.50 Food' to record a transaction.");
            println!("Run 'fintrack categories' to see the recognized categories.");
        }
        Some(Commands::Config) => {
            println!("fintrack Configuration");
            println!("======================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Settings file:     {}", paths.settings_file().display());
            println!("Transactions file: {}", paths.transactions_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:    {}", settings.currency_symbol);
            println!("  Date format:        {}", settings.date_format);
            println!("  Default range:      {:?}", settings.default_range);
            println!("  Legacy type policy: {:?}", settings.legacy_type_policy);
        }
        Some(Commands::Txn(cmd)) => {
            let storage = Storage::open(paths)?;
            handle_transaction_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Import(args)) => {
            let storage = Storage::open(paths)?;
            handle_import_command(&storage, &settings, args)?;
        }
        Some(Commands::Report(cmd)) => {
            let storage = Storage::open(paths)?;
            handle_report_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Export(args)) => {
            let storage = Storage::open(paths)?;
            handle_export_command(&storage, &settings, args)?;
        }
        Some(Commands::Categories { kind }) => handle_categories_command(kind),
        None => {
            println!("fintrack - personal finance ledger");
            println!();
            println!("Run 'fintrack --help' for usage information.");
        }
    }

    Ok(())
}

fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        // Without RUST_LOG, only this crate logs, at the requested level.
        None => EnvFilter::new(format!(
            "{}={},{}={}",
            env!("CARGO_CRATE_NAME"),
            level,
            env!("CARGO_BIN_NAME"),
            level
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
