//! Plain-text views of budgets and transactions for the terminal.

use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    aggregation::{category_shares, linked_budget, net_balance, total_expenses, total_income},
    budget::{Budget, BudgetSummary, UsageLevel},
    currency::format_currency,
    transaction::{Transaction, TransactionType},
};

const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Renders a budget's usage as a fixed-width bar, e.g. "[######----]".
///
/// The fill is capped at 100% so overspent budgets show a full bar. An
/// unknown percentage renders as an empty bar of "?".
pub fn progress_bar(percentage: Option<i64>, width: usize) -> String {
    let Some(percentage) = percentage else {
        return format!("[{}]", "?".repeat(width));
    };

    let capped = percentage.clamp(0, 100) as usize;
    let filled = capped * width / 100;

    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// One line describing a budget and how much of it is used.
pub fn budget_line(budget: &Budget) -> String {
    let id = budget
        .id
        .map(|id| format!("#{id}"))
        .unwrap_or_else(|| "#?".to_owned());
    let percentage = match budget.percentage_used() {
        Some(percentage) => format!("{percentage}%"),
        None => "n/a".to_owned(),
    };
    let level = match budget.usage_level() {
        UsageLevel::Normal | UsageLevel::Unknown => "",
        UsageLevel::Warning => " (nearly spent)",
        UsageLevel::Exceeded => " (over budget)",
    };

    format!(
        "{id} {} [{}] {} {} / {} spent, {} remaining, {}{} {}",
        budget.name,
        budget.category,
        progress_bar(budget.percentage_used(), 20),
        format_currency(budget.spent),
        format_currency(budget.amount),
        format_currency(budget.remaining()),
        percentage,
        level,
        budget.status().label(),
    )
}

/// One line describing a transaction and the budget it is linked to.
///
/// Links to budgets missing from `budgets` are shown as unlinked.
pub fn transaction_line(transaction: &Transaction, budgets: &[Budget]) -> String {
    let id = transaction
        .id
        .map(|id| format!("#{id}"))
        .unwrap_or_else(|| "#?".to_owned());
    let date = transaction
        .transaction_date
        .format(DISPLAY_DATE_FORMAT)
        .unwrap_or_else(|_| transaction.transaction_date.to_string());
    let amount = match transaction.transaction_type {
        TransactionType::Income => format!("+{}", format_currency(transaction.amount)),
        TransactionType::Expense => format!("-{}", format_currency(transaction.amount)),
    };
    let budget = linked_budget(transaction, budgets)
        .map(|budget| budget.name.as_str())
        .unwrap_or("unlinked");

    let mut line = format!(
        "{id} {date} {} {amount} {} [{}] ({budget})",
        transaction.transaction_type, transaction.description, transaction.category,
    );

    if let Some(receipt_url) = &transaction.receipt_url {
        line.push_str(&format!(" receipt: {receipt_url}"));
    }

    line
}

/// The totals over all budgets, one figure per line.
pub fn budget_summary_view(summary: &BudgetSummary) -> String {
    format!(
        "Total budgeted: {}\nTotal spent: {}\nTotal remaining: {}\nBudgets: {} ({} over budget)",
        format_currency(summary.total_budgeted),
        format_currency(summary.total_spent),
        format_currency(summary.total_remaining),
        summary.total_budgets,
        summary.over_budget_count,
    )
}

/// Income, expenses and the balance between them.
pub fn totals_view(transactions: &[Transaction]) -> String {
    format!(
        "Income: {}\nExpenses: {}\nNet: {}",
        format_currency(total_income(transactions)),
        format_currency(total_expenses(transactions)),
        format_currency(net_balance(transactions)),
    )
}

/// Expenses grouped by category with each category's share.
pub fn breakdown_view(transactions: &[Transaction]) -> String {
    let shares = category_shares(transactions);

    if shares.is_empty() {
        return "No expenses.".to_owned();
    }

    shares
        .iter()
        .map(|share| {
            let percentage = share
                .percentage
                .map(|percentage| format!("{percentage}%"))
                .unwrap_or_else(|| "n/a".to_owned());

            format!(
                "{}: {} ({percentage})",
                share.category,
                format_currency(share.total)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use time::macros::datetime;

    use crate::{
        budget::{Budget, BudgetSummary},
        report::{
            breakdown_view, budget_line, budget_summary_view, progress_bar, totals_view,
            transaction_line,
        },
        transaction::{Transaction, TransactionType},
    };

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    fn budget(id: i64, amount: &str, spent: &str) -> Budget {
        Budget {
            id: Some(id),
            name: "Cloud Compute".to_owned(),
            category: "Infrastructure".to_owned(),
            amount: dec(amount),
            spent: dec(spent),
        }
    }

    fn transaction(
        category: &str,
        amount: &str,
        transaction_type: TransactionType,
        budget_id: Option<i64>,
    ) -> Transaction {
        Transaction {
            id: Some(1),
            description: "AWS invoice".to_owned(),
            amount: dec(amount),
            category: category.to_owned(),
            transaction_date: datetime!(2024-01-15 10:30:00),
            transaction_type,
            budget_id,
            receipt_url: None,
        }
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(Some(0), 10), "[----------]");
        assert_eq!(progress_bar(Some(64), 10), "[######----]");
        assert_eq!(progress_bar(Some(100), 10), "[##########]");
    }

    #[test]
    fn progress_bar_caps_overspent_budgets() {
        assert_eq!(progress_bar(Some(107), 10), "[##########]");
    }

    #[test]
    fn progress_bar_for_unknown_percentage() {
        assert_eq!(progress_bar(None, 4), "[????]");
    }

    #[test]
    fn budget_line_shows_metrics() {
        let line = budget_line(&budget(1, "5000", "3200"));

        assert_eq!(
            line,
            "#1 Cloud Compute [Infrastructure] [############--------] \
             $3,200.00 / $5,000.00 spent, $1,800.00 remaining, 64% ON TRACK"
        );
    }

    #[test]
    fn budget_line_flags_overspending() {
        let line = budget_line(&budget(3, "1500", "1600"));

        assert!(line.contains("-$100.00 remaining"), "{line}");
        assert!(line.contains("107% (over budget) OVERSPENT"), "{line}");
    }

    #[test]
    fn budget_line_without_positive_amount() {
        let line = budget_line(&budget(4, "0", "10"));

        assert!(line.contains("n/a"), "{line}");
        assert!(line.ends_with("OVERSPENT"), "{line}");
    }

    #[test]
    fn transaction_line_names_linked_budget() {
        let budgets = vec![budget(2, "5000", "0")];
        let transaction = transaction("Infrastructure", "1234.5", TransactionType::Expense, Some(2));

        assert_eq!(
            transaction_line(&transaction, &budgets),
            "#1 2024-01-15 EXPENSE -$1,234.50 AWS invoice [Infrastructure] (Cloud Compute)"
        );
    }

    #[test]
    fn transaction_line_shows_dangling_link_as_unlinked() {
        let transaction = transaction("Infrastructure", "10", TransactionType::Income, Some(99));

        let line = transaction_line(&transaction, &[]);

        assert!(line.contains("+$10.00"), "{line}");
        assert!(line.ends_with("(unlinked)"), "{line}");
    }

    #[test]
    fn transaction_line_appends_receipt() {
        let mut transaction = transaction("Food", "12", TransactionType::Expense, None);
        transaction.receipt_url = Some("https://receipts.example.com/42.pdf".to_owned());

        assert_eq!(
            transaction_line(&transaction, &[]),
            "#1 2024-01-15 EXPENSE -$12.00 AWS invoice [Food] (unlinked) \
             receipt: https://receipts.example.com/42.pdf"
        );
    }

    #[test]
    fn summary_view_lists_totals() {
        let summary = BudgetSummary {
            total_budgeted: dec("14500"),
            total_spent: dec("12800"),
            total_remaining: dec("1700"),
            over_budget_count: 1,
            total_budgets: 3,
        };

        assert_eq!(
            budget_summary_view(&summary),
            "Total budgeted: $14,500.00\nTotal spent: $12,800.00\n\
             Total remaining: $1,700.00\nBudgets: 3 (1 over budget)"
        );
    }

    #[test]
    fn totals_and_breakdown_views() {
        let transactions = vec![
            transaction("A", "10", TransactionType::Expense, None),
            transaction("B", "30", TransactionType::Expense, None),
            transaction("Salary", "100", TransactionType::Income, None),
        ];

        assert_eq!(
            totals_view(&transactions),
            "Income: $100.00\nExpenses: $40.00\nNet: $60.00"
        );
        assert_eq!(
            breakdown_view(&transactions),
            "A: $10.00 (25%)\nB: $30.00 (75%)"
        );
        assert_eq!(breakdown_view(&[]), "No expenses.");
    }
}
