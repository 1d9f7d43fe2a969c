//! Aggregate figures over all budgets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budget::Budget;

/// Totals across a set of budgets, as served by the summary endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    /// The sum of all budget ceilings.
    pub total_budgeted: Decimal,
    /// The sum of the backend-computed spent amounts.
    pub total_spent: Decimal,
    /// `total_budgeted - total_spent`.
    pub total_remaining: Decimal,
    /// How many budgets are overspent.
    pub over_budget_count: u64,
    /// How many budgets there are.
    pub total_budgets: u64,
}

impl BudgetSummary {
    /// Summarize cached budgets without a round trip to the backend.
    ///
    /// Only sums the budgets' fields, each budget's `spent` is used as given.
    pub fn from_budgets(budgets: &[Budget]) -> Self {
        let total_budgeted = budgets.iter().map(|budget| budget.amount).sum::<Decimal>();
        let total_spent = budgets.iter().map(|budget| budget.spent).sum::<Decimal>();
        let over_budget_count = budgets.iter().filter(|budget| budget.is_overspent()).count();

        Self {
            total_budgeted,
            total_spent,
            total_remaining: total_budgeted - total_spent,
            over_budget_count: over_budget_count as u64,
            total_budgets: budgets.len() as u64,
        }
    }
}
