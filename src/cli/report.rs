//! CLI commands for reports

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;

use super::RangeArgs;
use crate::config::Settings;
use crate::display::report::double_separator;
use crate::error::{FintrackError, FintrackResult};
use crate::reports::dashboard::{format_categories, format_monthly, format_summary};
use crate::reports::{DashboardReport, ReportSection};
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Income, expense and net totals
    Summary {
        #[command(flatten)]
        range: RangeArgs,
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Per-month income and expenses
    Monthly {
        #[command(flatten)]
        range: RangeArgs,
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Expense totals per category
    Categories {
        #[command(flatten)]
        range: RangeArgs,
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// All of the above plus savings insights
    Dashboard {
        #[command(flatten)]
        range: RangeArgs,
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Write one section, or the whole report when `section` is `None`, as CSV
fn write_report_csv(
    report: &DashboardReport,
    section: Option<ReportSection>,
    path: &Path,
) -> FintrackResult<()> {
    let file = File::create(path).map_err(|e| {
        FintrackError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);

    match section {
        Some(section) => report.export_sections_csv(&mut writer, &[section])?,
        None => report.export_csv(&mut writer)?,
    }

    writer
        .flush()
        .map_err(|e| FintrackError::Export(format!("Failed to write {}: {}", path.display(), e)))
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> FintrackResult<()> {
    let (range, output, section) = match cmd {
        ReportCommands::Summary { range, output } => (range, output, Some(ReportSection::Summary)),
        ReportCommands::Monthly { range, output } => (range, output, Some(ReportSection::Monthly)),
        ReportCommands::Categories { range, output } => {
            (range, output, Some(ReportSection::Categories))
        }
        ReportCommands::Dashboard { range, output } => (range, output, None),
    };

    let range = range.resolve(settings)?;
    let snapshot = storage.transactions.get_all()?;
    let report = DashboardReport::generate(&snapshot, range);

    if let Some(path) = output {
        write_report_csv(&report, section, &path)?;
        println!("Report exported to: {}", path.display());
        return Ok(());
    }

    match section {
        Some(ReportSection::Summary) => {
            println!("Summary: {}", report.range);
            println!("{}", double_separator(40));
            print!("{}", format_summary(&report.summary));
            println!("Transactions:   {:>14}", report.transaction_count);
        }
        Some(ReportSection::Monthly) => {
            println!("Monthly Overview: {}", report.range);
            println!("{}", double_separator(72));
            print!("{}", format_monthly(&report.monthly));
        }
        Some(ReportSection::Categories) => {
            println!("Expense Categories: {}", report.range);
            println!("{}", double_separator(72));
            print!("{}", format_categories(&report.categories));
        }
        None => print!("{}", report.format_terminal()),
    }

    Ok(())
}
