use std::str::FromStr;

use crate::transaction::{Transaction, TransactionType};

/// Narrows an already fetched list of transactions by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionFilter {
    /// Keep every transaction.
    #[default]
    All,
    /// Keep income only.
    Income,
    /// Keep expenses only.
    Expense,
}

impl TransactionFilter {
    /// Whether `transaction` passes the filter.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            TransactionFilter::All => true,
            TransactionFilter::Income => transaction.transaction_type == TransactionType::Income,
            TransactionFilter::Expense => transaction.transaction_type == TransactionType::Expense,
        }
    }

    /// The transactions that pass the filter, in their original order.
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|transaction| self.matches(transaction))
            .collect()
    }
}

impl From<TransactionType> for TransactionFilter {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Income => TransactionFilter::Income,
            TransactionType::Expense => TransactionFilter::Expense,
        }
    }
}

impl FromStr for TransactionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TransactionFilter::All);
        }

        TransactionType::from_str(s).map(TransactionFilter::from)
    }
}
