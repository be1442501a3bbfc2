//! Reports module for fintrack
//!
//! The transaction aggregator and the reports built on it: a period
//! dashboard and savings insights.

pub mod aggregate;
pub mod dashboard;
pub mod insights;

pub use aggregate::{
    bucket_by_category, bucket_by_month, filter_by_range, summarize, top_category,
    CategoryBucket, MonthlyBucket, Summary,
};
pub use dashboard::{DashboardReport, ReportSection};
pub use insights::{Insight, InsightKind, SavingsInsights};
