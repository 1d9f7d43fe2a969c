//! The backend API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/budgets/{budget_id}', use [format_endpoint].

/// Plain-text connectivity probe.
pub const TEST: &str = "/api/test";

/// The profile of the user the credentials belong to.
pub const CURRENT_USER: &str = "/api/auth/me";

/// The route to list and create budgets.
pub const BUDGETS: &str = "/api/budgets";
/// The route to get, update and delete a single budget.
pub const BUDGET: &str = "/api/budgets/{budget_id}";
/// The route for the aggregate figures over all budgets.
pub const BUDGET_SUMMARY: &str = "/api/budgets/summary";

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to get, update and delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route prefix for transactions in a category. The category name is
/// appended as an encoded path segment.
pub const TRANSACTIONS_BY_CATEGORY: &str = "/api/transactions/category";
/// The route for transactions within a date range, given as `start` and `end`
/// query parameters.
pub const TRANSACTIONS_BY_DATE_RANGE: &str = "/api/transactions/date-range";
/// The route for transactions linked to a budget.
pub const TRANSACTIONS_BY_BUDGET: &str = "/api/transactions/budget/{budget_id}";
/// The route for transactions of one type.
pub const TRANSACTIONS_BY_TYPE: &str = "/api/transactions/type/{type}";

/// Replace the first parameter in `endpoint_path` with `value`.
///
/// Paths without a parameter are returned unchanged.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_endpoint("/api/budgets/{budget_id}", 42), "/api/budgets/42");
/// ```
pub fn format_endpoint(endpoint_path: &str, value: impl std::fmt::Display) -> String {
    let param_start = match endpoint_path.find('{') {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        value,
        &endpoint_path[param_end..]
    )
}
