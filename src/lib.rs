//! Fintrack is a client for a personal finance tracker backend.
//!
//! This library holds the client-side session, the budget and transaction
//! models with their derived metrics, and a typed gateway to the backend's
//! REST API. The `fintrack` binary is a command-line front end built on top.

#![warn(missing_docs)]

mod aggregation;
mod alert;
mod budget;
mod cache;
mod config;
mod currency;
mod database_id;
mod db;
mod endpoints;
mod error;
mod gateway;
mod logging;
mod report;
mod session;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use aggregation::{
    CategoryShare, CategoryTotal, category_shares, linked_budget, net_balance, total_budgeted,
    total_by_type, total_expenses, total_income, total_spent, totals_by_category,
};
pub use alert::Alert;
pub use budget::{Budget, BudgetDraft, BudgetStatus, BudgetSummary, UsageLevel};
pub use cache::{Record, RecordCache, ViewHandle, ViewScope};
pub use config::{ClientConfig, DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
pub use currency::{format_currency, parse_currency};
pub use database_id::{BudgetId, DatabaseId, TransactionId};
pub use error::Error;
pub use gateway::{CONNECTION_ERROR_STATUS, Gateway, UserProfile};
pub use logging::{LOG_BODY_LENGTH_LIMIT, init_logging};
pub use report::{
    breakdown_view, budget_line, budget_summary_view, progress_bar, totals_view, transaction_line,
};
pub use session::{
    AUTH_HEADER_KEY, CredentialToken, MemorySessionStorage, SQLiteSessionStorage, Session,
    SessionStorage, SessionStore, SessionTicket, USERNAME_KEY,
};
pub use transaction::{
    Transaction, TransactionDraft, TransactionFilter, TransactionType, current_transaction_date,
    format_transaction_date, parse_transaction_date,
};
