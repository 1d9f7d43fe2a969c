//! Defines the transaction model and the payload used to write one.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::{
    Error,
    database_id::{BudgetId, TransactionId},
};

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The name the backend uses for the type, e.g. in `/api/transactions/type/{type}`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            other => Err(format!(
                "\"{other}\" is not a transaction type, expected INCOME or EXPENSE"
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// `amount` is always positive, the direction of the money is carried by
/// `transaction_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID the backend assigned to the transaction.
    pub id: Option<TransactionId>,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned.
    pub amount: Decimal,
    /// A free-form category label, e.g. "Infrastructure".
    pub category: String,
    /// When the transaction happened, in UTC without an offset suffix.
    #[serde(with = "crate::transaction::date")]
    pub transaction_date: PrimitiveDateTime,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The budget the transaction counts towards.
    ///
    /// This is a weak reference, the budget may no longer exist.
    #[serde(default)]
    pub budget_id: Option<BudgetId>,
    /// A link to a scanned receipt.
    #[serde(default)]
    pub receipt_url: Option<String>,
}

impl Transaction {
    /// Whether the transaction is an expense.
    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// The writable fields of the transaction, for editing.
    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            description: self.description.clone(),
            amount: self.amount,
            category: self.category.clone(),
            transaction_date: self.transaction_date,
            transaction_type: self.transaction_type,
            budget_id: self.budget_id,
            receipt_url: self.receipt_url.clone(),
        }
    }
}

/// The fields of a transaction the client may write.
///
/// To create a new `TransactionDraft`, use [TransactionDraft::new] and chain
/// [TransactionDraft::budget] or [TransactionDraft::receipt_url] for the
/// optional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    description: String,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
    category: String,
    #[serde(with = "crate::transaction::date")]
    transaction_date: PrimitiveDateTime,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    // Sent as null so that an update can unlink a budget.
    budget_id: Option<BudgetId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    receipt_url: Option<String>,
}

impl TransactionDraft {
    /// Create a transaction draft that is not linked to a budget.
    ///
    /// Leading and trailing whitespace is trimmed from `description` and
    /// `category`.
    ///
    /// # Errors
    ///
    /// Returns an [Error::EmptyField] if `description` or `category` is
    /// blank, or an [Error::NonPositiveAmount] if `amount` is not greater
    /// than zero.
    pub fn new(
        description: &str,
        amount: Decimal,
        category: &str,
        transaction_date: PrimitiveDateTime,
        transaction_type: TransactionType,
    ) -> Result<Self, Error> {
        let description = description.trim();
        let category = category.trim();

        if description.is_empty() {
            return Err(Error::EmptyField("description"));
        }

        if category.is_empty() {
            return Err(Error::EmptyField("category"));
        }

        if amount <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount(amount));
        }

        Ok(Self {
            description: description.to_owned(),
            amount,
            category: category.to_owned(),
            transaction_date,
            transaction_type,
            budget_id: None,
            receipt_url: None,
        })
    }

    /// Link the transaction to a budget, or unlink it with `None`.
    pub fn budget(mut self, budget_id: Option<BudgetId>) -> Self {
        self.budget_id = budget_id;
        self
    }

    /// Attach a receipt link. Blank links are dropped.
    pub fn receipt_url(mut self, receipt_url: Option<&str>) -> Self {
        self.receipt_url = receipt_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_owned);
        self
    }

    /// The description of the transaction.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The amount of money spent or earned.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The category label.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// When the transaction happened.
    pub fn transaction_date(&self) -> PrimitiveDateTime {
        self.transaction_date
    }

    /// Whether the transaction is income or an expense.
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// The linked budget, if any.
    pub fn budget_id(&self) -> Option<BudgetId> {
        self.budget_id
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        Error,
        transaction::{Transaction, TransactionDraft, TransactionType},
    };

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[test]
    fn deserializes_backend_payload() {
        let json = json!({
            "id": 7,
            "description": "AWS invoice",
            "amount": "1234.50",
            "category": "Infrastructure",
            "transactionDate": "2024-01-15T10:30:00",
            "type": "EXPENSE",
            "budgetId": 3,
            "receiptUrl": null
        });

        let transaction: Transaction = serde_json::from_value(json).unwrap();

        assert_eq!(
            transaction,
            Transaction {
                id: Some(7),
                description: "AWS invoice".to_owned(),
                amount: dec("1234.50"),
                category: "Infrastructure".to_owned(),
                transaction_date: datetime!(2024-01-15 10:30:00),
                transaction_type: TransactionType::Expense,
                budget_id: Some(3),
                receipt_url: None,
            }
        );
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let json = r#"{
            "id": 8,
            "description": "Consulting",
            "amount": 900.0,
            "category": "Services",
            "transactionDate": "2024-02-01T09:00:00.123",
            "type": "INCOME"
        }"#;

        let transaction: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(transaction.transaction_type, TransactionType::Income);
        assert_eq!(transaction.budget_id, None);
        assert_eq!(transaction.receipt_url, None);
        assert!(!transaction.is_expense());
    }

    #[test]
    fn draft_serializes_without_id() {
        let draft = TransactionDraft::new(
            " AWS invoice ",
            dec("1234.5"),
            "Infrastructure",
            datetime!(2024-01-15 10:30:00),
            TransactionType::Expense,
        )
        .unwrap()
        .budget(Some(3));

        let json = serde_json::to_value(&draft).unwrap();

        assert_eq!(
            json,
            json!({
                "description": "AWS invoice",
                "amount": 1234.5,
                "category": "Infrastructure",
                "transactionDate": "2024-01-15T10:30:00",
                "type": "EXPENSE",
                "budgetId": 3
            })
        );
    }

    #[test]
    fn unlinked_draft_sends_null_budget() {
        let draft = TransactionDraft::new(
            "Salary",
            dec("100"),
            "Income",
            datetime!(2024-01-31 00:00:00),
            TransactionType::Income,
        )
        .unwrap()
        .receipt_url(Some("https://example.com/r/1"));

        let json = serde_json::to_value(&draft).unwrap();

        assert_eq!(json["budgetId"], serde_json::Value::Null);
        assert_eq!(json["receiptUrl"], "https://example.com/r/1");
    }

    #[test]
    fn blank_receipt_url_is_dropped() {
        let draft = TransactionDraft::new(
            "Salary",
            dec("100"),
            "Income",
            datetime!(2024-01-31 00:00:00),
            TransactionType::Income,
        )
        .unwrap()
        .receipt_url(Some("  "));

        let json = serde_json::to_value(&draft).unwrap();

        assert!(json.get("receiptUrl").is_none());
    }

    #[test]
    fn draft_rejects_invalid_fields() {
        let date = datetime!(2024-01-31 00:00:00);

        assert_eq!(
            TransactionDraft::new("", dec("1"), "Food", date, TransactionType::Expense),
            Err(Error::EmptyField("description"))
        );
        assert_eq!(
            TransactionDraft::new("Lunch", dec("1"), " ", date, TransactionType::Expense),
            Err(Error::EmptyField("category"))
        );
        assert_eq!(
            TransactionDraft::new("Lunch", dec("-12"), "Food", date, TransactionType::Expense),
            Err(Error::NonPositiveAmount(dec("-12")))
        );
    }

    #[test]
    fn to_draft_keeps_writable_fields() {
        let transaction = Transaction {
            id: Some(1),
            description: "Lunch".to_owned(),
            amount: dec("12.50"),
            category: "Food".to_owned(),
            transaction_date: datetime!(2024-03-01 12:00:00),
            transaction_type: TransactionType::Expense,
            budget_id: Some(2),
            receipt_url: None,
        };

        let draft = transaction.to_draft();

        assert_eq!(draft.description(), "Lunch");
        assert_eq!(draft.amount(), dec("12.50"));
        assert_eq!(draft.budget_id(), Some(2));
        assert_eq!(draft.transaction_type(), TransactionType::Expense);
    }

    #[test]
    fn parses_transaction_type_case_insensitively() {
        assert_eq!(
            TransactionType::from_str("income"),
            Ok(TransactionType::Income)
        );
        assert_eq!(
            TransactionType::from_str("EXPENSE"),
            Ok(TransactionType::Expense)
        );
        assert!(TransactionType::from_str("transfer").is_err());
    }
}
