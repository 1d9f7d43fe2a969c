mod core;
mod summary;

pub use self::core::{Budget, BudgetDraft, BudgetStatus, UsageLevel};
pub use summary::BudgetSummary;
