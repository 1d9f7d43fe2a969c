//! Income and expense transactions.
//!
//! This module contains the `Transaction` model as served by the backend,
//! the `TransactionDraft` payload used to create and update transactions,
//! and the type filter applied to fetched transaction lists.

mod core;
mod date;
mod filter;

pub use self::core::{Transaction, TransactionDraft, TransactionType};
pub use date::{current_transaction_date, format_transaction_date, parse_transaction_date};
pub use filter::TransactionFilter;
