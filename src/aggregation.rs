//! Totals and breakdowns over budget and transaction collections.
//!
//! Every function here is a pure sum or grouping over its input, so the
//! results do not depend on the order of the input except where noted.

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::{
    budget::Budget,
    transaction::{Transaction, TransactionType},
};

/// The summed amount of the expenses in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category label.
    pub category: String,
    /// The sum of the category's expense amounts.
    pub total: Decimal,
}

/// A category's portion of all expenses, for pie chart labels.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    /// The category label.
    pub category: String,
    /// The sum of the category's expense amounts.
    pub total: Decimal,
    /// The category's share of all expenses as a whole percentage.
    ///
    /// `None` when there are no expenses to take a share of.
    pub percentage: Option<i64>,
}

/// Sums the amounts of the transactions of one type.
pub fn total_by_type(transactions: &[Transaction], transaction_type: TransactionType) -> Decimal {
    transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == transaction_type)
        .map(|transaction| transaction.amount)
        .sum()
}

/// Sums the amounts of the income transactions.
pub fn total_income(transactions: &[Transaction]) -> Decimal {
    total_by_type(transactions, TransactionType::Income)
}

/// Sums the amounts of the expense transactions.
pub fn total_expenses(transactions: &[Transaction]) -> Decimal {
    total_by_type(transactions, TransactionType::Expense)
}

/// Income minus expenses.
pub fn net_balance(transactions: &[Transaction]) -> Decimal {
    total_income(transactions) - total_expenses(transactions)
}

/// Sums the ceilings of the budgets.
pub fn total_budgeted(budgets: &[Budget]) -> Decimal {
    budgets.iter().map(|budget| budget.amount).sum()
}

/// Sums the backend-computed spent amounts of the budgets.
pub fn total_spent(budgets: &[Budget]) -> Decimal {
    budgets.iter().map(|budget| budget.spent).sum()
}

/// Groups expenses by category and sums each group.
///
/// Income is excluded. Categories are listed in the order they first appear
/// in `transactions`, and the label is matched exactly.
pub fn totals_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions.iter().filter(|transaction| transaction.is_expense()) {
        match positions.get(transaction.category.as_str()) {
            Some(&position) => totals[position].total += transaction.amount,
            None => {
                positions.insert(&transaction.category, totals.len());
                totals.push(CategoryTotal {
                    category: transaction.category.clone(),
                    total: transaction.amount,
                });
            }
        }
    }

    totals
}

/// Each expense category's total with its share of all expenses.
///
/// Shares are rounded half away from zero, so they may not add up to exactly 100.
pub fn category_shares(transactions: &[Transaction]) -> Vec<CategoryShare> {
    let totals = totals_by_category(transactions);
    let grand_total: Decimal = totals.iter().map(|category| category.total).sum();

    totals
        .into_iter()
        .map(|CategoryTotal { category, total }| {
            let percentage = if grand_total > Decimal::ZERO {
                (total * Decimal::ONE_HUNDRED / grand_total)
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                    .to_i64()
            } else {
                None
            };

            CategoryShare {
                category,
                total,
                percentage,
            }
        })
        .collect()
}

/// Finds the budget a transaction is linked to.
///
/// Returns `None` both for unlinked transactions and for links to budgets
/// that are not in `budgets`, e.g. because the budget was deleted.
pub fn linked_budget<'a>(transaction: &Transaction, budgets: &'a [Budget]) -> Option<&'a Budget> {
    let budget_id = transaction.budget_id?;

    budgets.iter().find(|budget| budget.id == Some(budget_id))
}
