use reqwest::Method;
use time::PrimitiveDateTime;

use crate::{
    Error,
    database_id::{BudgetId, TransactionId},
    endpoints::{self, format_endpoint},
    gateway::Gateway,
    transaction::{Transaction, TransactionDraft, TransactionType, format_transaction_date},
};

impl Gateway {
    /// Fetch every transaction.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, Error> {
        let url = self.endpoint_url(endpoints::TRANSACTIONS)?;

        self.get_json(url).await
    }

    /// Fetch one transaction.
    pub async fn get_transaction(&self, transaction_id: TransactionId) -> Result<Transaction, Error> {
        let url = self.endpoint_url(&format_endpoint(endpoints::TRANSACTION, transaction_id))?;

        self.get_json(url).await
    }

    /// Create a transaction and return it as saved, with its ID assigned.
    ///
    /// The linked budget's `spent` changes on the backend, refetch the
    /// budget to see it.
    pub async fn create_transaction(&self, draft: &TransactionDraft) -> Result<Transaction, Error> {
        let url = self.endpoint_url(endpoints::TRANSACTIONS)?;

        let transaction: Transaction = self.send_json(Method::POST, url, draft).await?;
        tracing::info!(
            "Created transaction {:?} \"{}\".",
            transaction.id,
            transaction.description
        );

        Ok(transaction)
    }

    /// Replace the writable fields of a transaction and return it as saved.
    pub async fn update_transaction(
        &self,
        transaction_id: TransactionId,
        draft: &TransactionDraft,
    ) -> Result<Transaction, Error> {
        let url = self.endpoint_url(&format_endpoint(endpoints::TRANSACTION, transaction_id))?;

        self.send_json(Method::PUT, url, draft).await
    }

    /// Delete a transaction.
    pub async fn delete_transaction(&self, transaction_id: TransactionId) -> Result<(), Error> {
        let url = self.endpoint_url(&format_endpoint(endpoints::TRANSACTION, transaction_id))?;

        self.send(Method::DELETE, url, None).await?;
        tracing::info!("Deleted transaction {transaction_id}.");

        Ok(())
    }

    /// Fetch the transactions in `category`.
    ///
    /// The category is sent as a single path segment, so labels containing
    /// spaces or slashes are encoded rather than changing the route.
    pub async fn transactions_by_category(&self, category: &str) -> Result<Vec<Transaction>, Error> {
        let mut url = self.endpoint_url(endpoints::TRANSACTIONS_BY_CATEGORY)?;
        let invalid_url = Error::InvalidUrl(url.to_string());
        url.path_segments_mut()
            .map_err(|_| invalid_url)?
            .push(category);

        self.get_json(url).await
    }

    /// Fetch the transactions dated between `start` and `end`, inclusive.
    pub async fn transactions_by_date_range(
        &self,
        start: PrimitiveDateTime,
        end: PrimitiveDateTime,
    ) -> Result<Vec<Transaction>, Error> {
        let mut url = self.endpoint_url(endpoints::TRANSACTIONS_BY_DATE_RANGE)?;
        url.query_pairs_mut()
            .append_pair("start", &format_transaction_date(&start)?)
            .append_pair("end", &format_transaction_date(&end)?);

        self.get_json(url).await
    }

    /// Fetch the transactions linked to a budget.
    pub async fn transactions_by_budget(&self, budget_id: BudgetId) -> Result<Vec<Transaction>, Error> {
        let url = self.endpoint_url(&format_endpoint(endpoints::TRANSACTIONS_BY_BUDGET, budget_id))?;

        self.get_json(url).await
    }

    /// Fetch the transactions of one type.
    pub async fn transactions_by_type(
        &self,
        transaction_type: TransactionType,
    ) -> Result<Vec<Transaction>, Error> {
        let url = self.endpoint_url(&format_endpoint(
            endpoints::TRANSACTIONS_BY_TYPE,
            transaction_type,
        ))?;

        self.get_json(url).await
    }
}
