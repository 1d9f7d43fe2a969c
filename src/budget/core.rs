//! Defines the budget model and the metrics derived from it.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::BudgetId};

/// Percentage at which a budget's usage is flagged as a warning.
const WARNING_PERCENTAGE: i64 = 80;

/// A named spending ceiling for a category.
///
/// `spent` is computed by the backend from the transactions linked to the
/// budget. The client treats it as authoritative and never recomputes it,
/// it only derives display metrics from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// The ID the backend assigned to the budget.
    pub id: Option<BudgetId>,
    /// The name of the budget, e.g. "Cloud Compute".
    pub name: String,
    /// A free-form category label, e.g. "Infrastructure".
    pub category: String,
    /// The allocated ceiling.
    pub amount: Decimal,
    /// The total of the expenses linked to this budget.
    #[serde(default)]
    pub spent: Decimal,
}

/// Whether a budget is within its ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    /// Nothing or less than the ceiling has been spent.
    OnTrack,
    /// More than the ceiling has been spent.
    Overspent,
}

impl BudgetStatus {
    /// The label shown on budget cards.
    pub fn label(&self) -> &'static str {
        match self {
            BudgetStatus::OnTrack => "ON TRACK",
            BudgetStatus::Overspent => "OVERSPENT",
        }
    }
}

/// How full a budget's progress bar is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageLevel {
    /// Below the warning threshold.
    Normal,
    /// At or above 80% used.
    Warning,
    /// Over 100% used.
    Exceeded,
    /// The budget has no positive amount so usage cannot be computed.
    Unknown,
}

impl Budget {
    /// The amount left before the ceiling is reached. Negative when overspent.
    pub fn remaining(&self) -> Decimal {
        self.amount - self.spent
    }

    /// The share of the budget spent as a whole percentage, rounded half up.
    ///
    /// Returns `None` when `amount` is zero or negative, since there is no
    /// meaningful percentage to show.
    pub fn percentage_used(&self) -> Option<i64> {
        if self.amount <= Decimal::ZERO {
            return None;
        }

        self.spent
            .checked_mul(Decimal::ONE_HUNDRED)?
            .checked_div(self.amount)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
    }

    /// Whether more than the ceiling has been spent.
    pub fn is_overspent(&self) -> bool {
        self.remaining() < Decimal::ZERO
    }

    /// Classify the budget by its remaining amount.
    pub fn status(&self) -> BudgetStatus {
        if self.is_overspent() {
            BudgetStatus::Overspent
        } else {
            BudgetStatus::OnTrack
        }
    }

    /// Classify how full the budget's progress bar is.
    pub fn usage_level(&self) -> UsageLevel {
        match self.percentage_used() {
            None => UsageLevel::Unknown,
            Some(percentage) if percentage > 100 => UsageLevel::Exceeded,
            Some(percentage) if percentage >= WARNING_PERCENTAGE => UsageLevel::Warning,
            Some(_) => UsageLevel::Normal,
        }
    }

    /// The writable fields of the budget, for editing.
    pub fn to_draft(&self) -> BudgetDraft {
        BudgetDraft {
            name: self.name.clone(),
            category: self.category.clone(),
            amount: self.amount,
        }
    }
}

/// The fields of a budget the client may write.
///
/// The ID and `spent` are assigned by the backend, so they are left out of
/// create and update payloads by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetDraft {
    name: String,
    category: String,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
}

impl BudgetDraft {
    /// Create a budget draft.
    ///
    /// Leading and trailing whitespace is trimmed from `name` and `category`.
    ///
    /// # Errors
    ///
    /// Returns an [Error::EmptyField] if `name` or `category` is blank, or an
    /// [Error::NonPositiveAmount] if `amount` is not greater than zero.
    pub fn new(name: &str, category: &str, amount: Decimal) -> Result<Self, Error> {
        let name = name.trim();
        let category = category.trim();

        if name.is_empty() {
            return Err(Error::EmptyField("name"));
        }

        if category.is_empty() {
            return Err(Error::EmptyField("category"));
        }

        if amount <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount(amount));
        }

        Ok(Self {
            name: name.to_owned(),
            category: category.to_owned(),
            amount,
        })
    }

    /// The name of the budget.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The category label.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The allocated ceiling.
    pub fn amount(&self) -> Decimal {
        self.amount
    }
}
