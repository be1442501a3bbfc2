//! Dashboard Report
//!
//! Everything the dashboard shows for one reporting period, rebuilt from a
//! full snapshot on every call.

use std::io::Write;

use serde::Serialize;

use super::aggregate::{
    bucket_by_category, bucket_by_month, filter_by_range, summarize, top_category,
    CategoryBucket, MonthlyBucket, Summary,
};
use super::insights::{InsightKind, SavingsInsights};
use crate::display::report::{double_separator, format_bar, format_percentage, separator, share_of};
use crate::error::{FintrackError, FintrackResult};
use crate::export::csv::escape_csv;
use crate::models::{DateRange, Money, Transaction};

const BAR_WIDTH: usize = 20;

/// Parts of the report that can be exported on their own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSection {
    Summary,
    Monthly,
    Categories,
}

impl ReportSection {
    pub const ALL: [ReportSection; 3] = [Self::Summary, Self::Monthly, Self::Categories];
}

/// Summary views for a reporting period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub range: DateRange,
    /// Transactions inside the range
    pub transaction_count: usize,
    pub summary: Summary,
    /// Oldest month first
    pub monthly: Vec<MonthlyBucket>,
    /// Expense categories in order of first appearance
    pub categories: Vec<CategoryBucket>,
    pub top_category: Option<CategoryBucket>,
    pub insights: SavingsInsights,
}

impl DashboardReport {
    /// Generate the report for `range` from a full snapshot
    pub fn generate(snapshot: &[Transaction], range: DateRange) -> Self {
        let in_range = filter_by_range(snapshot, &range);
        let summary = summarize(&in_range);
        let monthly = bucket_by_month(&in_range);
        let categories = bucket_by_category(&in_range);
        let top = top_category(&categories).cloned();
        let insights = SavingsInsights::from_summary(&summary, top.as_ref());

        tracing::debug!(
            range = %range,
            snapshot = snapshot.len(),
            in_range = in_range.len(),
            "Recomputed dashboard"
        );

        Self {
            range,
            transaction_count: in_range.len(),
            summary,
            monthly,
            categories,
            top_category: top,
            insights,
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Dashboard: {} ({} to {})\n",
            self.range,
            self.range.start(),
            self.range.end()
        ));
        output.push_str(&double_separator(72));
        output.push('\n');
        output.push_str(&format_summary(&self.summary));
        output.push_str(&format!("Transactions:   {}\n", self.transaction_count));

        output.push_str("\nMonthly Overview\n");
        output.push_str(&format_monthly(&self.monthly));

        output.push_str("\nExpense Categories\n");
        output.push_str(&format_categories(&self.categories));

        if self.transaction_count > 0 {
            output.push_str("\nInsights\n");
            output.push_str(&format!("  {}\n", self.insights.narrative(&self.summary)));
            for insight in &self.insights.insights {
                let marker = match insight.kind {
                    InsightKind::Positive => '+',
                    InsightKind::Negative => '!',
                    InsightKind::Neutral => '-',
                };
                output.push_str(&format!("  {} {}\n", marker, insight.text));
            }
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> FintrackResult<()> {
        self.export_sections_csv(writer, &ReportSection::ALL)
    }

    /// Export only the given sections, in the order given
    pub fn export_sections_csv<W: Write>(
        &self,
        writer: &mut W,
        sections: &[ReportSection],
    ) -> FintrackResult<()> {
        let export_err = |e: std::io::Error| FintrackError::Export(e.to_string());

        writeln!(writer, "Section,Key,Income,Expenses,Amount").map_err(export_err)?;

        for section in sections {
            match section {
                ReportSection::Summary => writeln!(
                    writer,
                    "summary,{},{},{},{}",
                    escape_csv(&self.range.to_string()),
                    self.summary.total_income.to_decimal_string(),
                    self.summary.total_expenses.to_decimal_string(),
                    self.summary.net.to_decimal_string()
                )
                .map_err(export_err)?,
                ReportSection::Monthly => {
                    for bucket in &self.monthly {
                        writeln!(
                            writer,
                            "month,{},{},{},{}",
                            bucket.label(),
                            bucket.income.to_decimal_string(),
                            bucket.expenses.to_decimal_string(),
                            bucket.net().to_decimal_string()
                        )
                        .map_err(export_err)?;
                    }
                }
                ReportSection::Categories => {
                    for bucket in &self.categories {
                        writeln!(
                            writer,
                            "category,{},,{},{}",
                            escape_csv(&bucket.category),
                            bucket.amount.to_decimal_string(),
                            bucket.amount.to_decimal_string()
                        )
                        .map_err(export_err)?;
                    }
                }
            }
        }

        Ok(())
    }
}

/// Totals block shared by the summary and dashboard views
pub fn format_summary(summary: &Summary) -> String {
    format!(
        "Total Income:   {:>14}\nTotal Expenses: {:>14}\nNet:            {:>14}\n",
        summary.total_income.to_string(),
        summary.total_expenses.to_string(),
        summary.net.to_string()
    )
}

/// Monthly table with an expense bar per month
pub fn format_monthly(monthly: &[MonthlyBucket]) -> String {
    if monthly.is_empty() {
        return "  No transactions in range.\n".to_string();
    }

    let max_expense = monthly
        .iter()
        .map(|b| b.expenses.cents())
        .max()
        .unwrap_or(0) as f64;

    let mut output = format!(
        "  {:<10} {:>14} {:>14} {:>14}\n",
        "Month", "Income", "Expenses", "Net"
    );
    output.push_str(&format!("  {}\n", separator(55)));

    for bucket in monthly {
        output.push_str(&format!(
            "  {:<10} {:>14} {:>14} {:>14} {}\n",
            bucket.label(),
            bucket.income.to_string(),
            bucket.expenses.to_string(),
            bucket.net().to_string(),
            format_bar(bucket.expenses.cents() as f64, max_expense, BAR_WIDTH)
        ));
    }

    output
}

/// Category table with share of total spending
pub fn format_categories(categories: &[CategoryBucket]) -> String {
    if categories.is_empty() {
        return "  No expenses in range.\n".to_string();
    }

    let total: Money = categories.iter().map(|c| c.amount).sum();

    let mut output = format!("  {:<24} {:>14} {:>7}\n", "Category", "Amount", "%");
    output.push_str(&format!("  {}\n", separator(47)));

    for bucket in categories {
        let pct = share_of(bucket.amount, total);
        output.push_str(&format!(
            "  {:<24} {:>14} {:>7} {}\n",
            bucket.category,
            bucket.amount.to_string(),
            format_percentage(pct),
            format_bar(pct, 100.0, BAR_WIDTH)
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, sample_ledger};

    #[test]
    fn test_generate_for_month() {
        let report = DashboardReport::generate(&sample_ledger(), DateRange::month(2024, 1).unwrap());

        assert_eq!(report.transaction_count, 10);
        assert_eq!(report.summary.net, Money::from_units(2200));
        assert_eq!(report.monthly.len(), 1);
        assert_eq!(report.categories.len(), 4);
        assert_eq!(report.top_category.as_ref().unwrap().category, "Savings");
    }

    #[test]
    fn test_generate_outside_data_is_empty() {
        let report = DashboardReport::generate(&sample_ledger(), DateRange::month(2023, 6).unwrap());

        assert_eq!(report.transaction_count, 0);
        assert_eq!(report.summary, Summary::default());
        assert!(report.monthly.is_empty());
        assert!(report.top_category.is_none());
        assert!(report.format_terminal().contains("No transactions in range."));
    }

    #[test]
    fn test_custom_range_narrows_results() {
        let range = DateRange::custom(date(2024, 1, 10), date(2024, 1, 20)).unwrap();
        let report = DashboardReport::generate(&sample_ledger(), range);

        assert_eq!(report.transaction_count, 6);
        assert_eq!(report.summary.total_income, Money::from_units(5000));
        assert_eq!(report.summary.total_expenses, Money::from_units(1925));
    }

    #[test]
    fn test_format_terminal() {
        let report = DashboardReport::generate(&sample_ledger(), DateRange::month(2024, 1).unwrap());
        let text = report.format_terminal();

        assert!(text.starts_with("Dashboard: Jan 2024 (2024-01-01 to 2024-01-31)"));
        assert!(text.contains("$5500.00"));
        assert!(text.contains("Jan 2024"));
        assert!(text.contains("Housing"));
        assert!(text.contains("Your highest spending category is Savings at $1500.00."));
    }

    #[test]
    fn test_export_csv() {
        let report = DashboardReport::generate(&sample_ledger(), DateRange::month(2024, 1).unwrap());

        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Section,Key,Income,Expenses,Amount");
        assert_eq!(lines[1], "summary,Jan 2024,5500.00,3300.00,2200.00");
        assert_eq!(lines[2], "month,Jan 2024,5500.00,3300.00,2200.00");
        assert_eq!(lines[3], "category,Housing,,1350.00,1350.00");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_export_single_section() {
        let report = DashboardReport::generate(&sample_ledger(), DateRange::month(2024, 1).unwrap());

        let mut out = Vec::new();
        report
            .export_sections_csv(&mut out, &[ReportSection::Categories])
            .unwrap();
        let csv = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1..].iter().all(|l| l.starts_with("category,")));
        assert_eq!(lines[3], "category,Savings,,1500.00,1500.00");
    }
}
