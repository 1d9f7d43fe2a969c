//! Database ID type definitions.
//!
//! IDs are assigned by the backend; records built on the client carry no ID
//! until the backend has accepted them.

/// Alias for the integer type the backend uses for record IDs.
pub type DatabaseId = i64;

/// The ID of a budget.
pub type BudgetId = DatabaseId;

/// The ID of a transaction.
pub type TransactionId = DatabaseId;
