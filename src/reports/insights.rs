//! Savings insights
//!
//! Derives a savings rate and a short list of observations from a period's
//! summary and expense breakdown.

use serde::Serialize;

use super::aggregate::{CategoryBucket, Summary};
use crate::models::Money;

/// Savings rate above which the period counts as healthy
pub const HEALTHY_SAVINGS_RATE: f64 = 20.0;

/// Savings rate below which the period is flagged
pub const LOW_SAVINGS_RATE: f64 = 10.0;

/// Tone of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub text: String,
}

/// Savings figures for a period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsInsights {
    /// Income minus expenses (negative for a deficit)
    pub savings: Money,
    /// Savings as a percentage of income; zero when there is no income
    pub savings_rate: f64,
    pub insights: Vec<Insight>,
}

impl SavingsInsights {
    /// Build insights from a summary and the top expense category
    pub fn from_summary(summary: &Summary, top_category: Option<&CategoryBucket>) -> Self {
        let savings = summary.net;
        let savings_rate = savings_rate(summary);

        let mut insights = Vec::new();
        if savings_rate > HEALTHY_SAVINGS_RATE {
            insights.push(Insight {
                kind: InsightKind::Positive,
                text: "Excellent savings rate! You're on track for strong financial health."
                    .to_string(),
            });
        } else if savings_rate < LOW_SAVINGS_RATE {
            insights.push(Insight {
                kind: InsightKind::Negative,
                text: "Consider reducing expenses or increasing income to improve your savings rate."
                    .to_string(),
            });
        }

        if let Some(top) = top_category {
            insights.push(Insight {
                kind: InsightKind::Neutral,
                text: format!(
                    "Your highest spending category is {} at {}.",
                    top.category, top.amount
                ),
            });
        }

        Self {
            savings,
            savings_rate,
            insights,
        }
    }

    /// One-paragraph description of the period
    pub fn narrative(&self, summary: &Summary) -> String {
        let outcome = if self.savings.is_negative() {
            "a deficit"
        } else {
            "savings"
        };

        format!(
            "During this period, you earned {} and spent {}, resulting in {} of {}. \
             Your savings rate is {:.1}%.",
            summary.total_income,
            summary.total_expenses,
            outcome,
            self.savings.abs(),
            self.savings_rate
        )
    }
}

/// Net as a percentage of income to one decimal place, zero when income is zero
///
/// The thresholds compare against this rounded figure, the one users see.
pub fn savings_rate(summary: &Summary) -> f64 {
    if summary.total_income.is_zero() {
        return 0.0;
    }

    let rate = summary.net.cents() as f64 * 100.0 / summary.total_income.cents() as f64;
    (rate * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(income: i64, expenses: i64) -> Summary {
        let total_income = Money::from_units(income);
        let total_expenses = Money::from_units(expenses);
        Summary {
            total_income,
            total_expenses,
            net: total_income - total_expenses,
        }
    }

    #[test]
    fn test_savings_rate() {
        assert_eq!(savings_rate(&summary(5000, 1500)), 70.0);
        assert_eq!(savings_rate(&summary(0, 1500)), 0.0);
        assert_eq!(savings_rate(&summary(1000, 1500)), -50.0);
    }

    #[test]
    fn test_thresholds_use_rounded_rate() {
        let just_above = SavingsInsights::from_summary(&summary(5000, 3998), None);
        assert_eq!(just_above.savings_rate, 20.0);
        assert!(just_above.insights.is_empty());

        let just_below = SavingsInsights::from_summary(&summary(5000, 4502), None);
        assert_eq!(just_below.savings_rate, 10.0);
        assert!(just_below.insights.is_empty());

        let healthy = SavingsInsights::from_summary(&summary(5000, 3997), None);
        assert_eq!(healthy.savings_rate, 20.1);
        assert_eq!(healthy.insights[0].kind, InsightKind::Positive);
    }

    #[test]
    fn test_healthy_period() {
        let top = CategoryBucket {
            category: "Housing".into(),
            amount: Money::from_units(1200),
        };
        let result = SavingsInsights::from_summary(&summary(5000, 1500), Some(&top));

        assert_eq!(result.savings, Money::from_units(3500));
        assert_eq!(result.insights.len(), 2);
        assert_eq!(result.insights[0].kind, InsightKind::Positive);
        assert_eq!(
            result.insights[1].text,
            "Your highest spending category is Housing at $1200.00."
        );
    }

    #[test]
    fn test_middling_rate_has_no_rate_insight() {
        let result = SavingsInsights::from_summary(&summary(1000, 850), None);
        assert!(result.insights.is_empty());
    }

    #[test]
    fn test_deficit_narrative() {
        let s = summary(1000, 1500);
        let result = SavingsInsights::from_summary(&s, None);

        assert_eq!(result.insights[0].kind, InsightKind::Negative);
        assert_eq!(
            result.narrative(&s),
            "During this period, you earned $1000.00 and spent $1500.00, resulting in \
             a deficit of $500.00. Your savings rate is -50.0%."
        );
    }
}
