use reqwest::Method;

use crate::{
    Error,
    budget::{Budget, BudgetDraft, BudgetSummary},
    database_id::BudgetId,
    endpoints::{self, format_endpoint},
    gateway::Gateway,
    transaction::Transaction,
};

impl Gateway {
    /// Fetch every budget with its backend-computed `spent`.
    pub async fn list_budgets(&self) -> Result<Vec<Budget>, Error> {
        let url = self.endpoint_url(endpoints::BUDGETS)?;

        self.get_json(url).await
    }

    /// Fetch one budget.
    pub async fn get_budget(&self, budget_id: BudgetId) -> Result<Budget, Error> {
        let url = self.endpoint_url(&format_endpoint(endpoints::BUDGET, budget_id))?;

        self.get_json(url).await
    }

    /// Fetch the budget `transaction` is linked to.
    ///
    /// Returns `None` for an unlinked transaction, and for a dangling link
    /// whose budget the backend no longer has. Every other error is returned.
    pub async fn get_linked_budget(
        &self,
        transaction: &Transaction,
    ) -> Result<Option<Budget>, Error> {
        let Some(budget_id) = transaction.budget_id else {
            return Ok(None);
        };

        match self.get_budget(budget_id).await {
            Ok(budget) => Ok(Some(budget)),
            Err(Error::ValidationFailure { status: 404, .. }) => {
                tracing::debug!(
                    "Transaction {:?} links to missing budget {budget_id}.",
                    transaction.id
                );
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    /// Create a budget and return it as saved, with its ID assigned.
    pub async fn create_budget(&self, draft: &BudgetDraft) -> Result<Budget, Error> {
        let url = self.endpoint_url(endpoints::BUDGETS)?;

        let budget: Budget = self.send_json(Method::POST, url, draft).await?;
        tracing::info!("Created budget {:?} \"{}\".", budget.id, budget.name);

        Ok(budget)
    }

    /// Replace the writable fields of a budget and return it as saved.
    pub async fn update_budget(
        &self,
        budget_id: BudgetId,
        draft: &BudgetDraft,
    ) -> Result<Budget, Error> {
        let url = self.endpoint_url(&format_endpoint(endpoints::BUDGET, budget_id))?;

        self.send_json(Method::PUT, url, draft).await
    }

    /// Delete a budget.
    ///
    /// Transactions linked to the budget keep their now dangling `budgetId`.
    pub async fn delete_budget(&self, budget_id: BudgetId) -> Result<(), Error> {
        let url = self.endpoint_url(&format_endpoint(endpoints::BUDGET, budget_id))?;

        self.send(Method::DELETE, url, None).await?;
        tracing::info!("Deleted budget {budget_id}.");

        Ok(())
    }

    /// Fetch the totals over all budgets.
    pub async fn budget_summary(&self) -> Result<BudgetSummary, Error> {
        let url = self.endpoint_url(endpoints::BUDGET_SUMMARY)?;

        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use axum::{
        Json, Router,
        extract::{Path, State},
        http::StatusCode,
        routing::get,
    };
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use time::macros::datetime;

    use crate::{
        Error,
        budget::{Budget, BudgetDraft},
        test_utils::{logged_in_gateway, serve},
        transaction::{Transaction, TransactionType},
    };

    fn transaction_linked_to(budget_id: Option<i64>) -> Transaction {
        Transaction {
            id: Some(1),
            description: "AWS invoice".to_owned(),
            amount: Decimal::from(100),
            category: "Infrastructure".to_owned(),
            transaction_date: datetime!(2024-01-15 10:30:00),
            transaction_type: TransactionType::Expense,
            budget_id,
            receipt_url: None,
        }
    }

    fn budget_json(id: i64) -> Value {
        json!({
            "id": id,
            "name": "Cloud Compute",
            "category": "Infrastructure",
            "amount": 5000.00,
            "spent": 3200.00
        })
    }

    #[tokio::test]
    async fn lists_budgets() {
        let router = Router::new().route(
            "/api/budgets",
            get(|| async { Json(json!([budget_json(1), budget_json(2)])) }),
        );
        let base_url = serve(router).await;
        let (gateway, _) = logged_in_gateway(&base_url, "user", "secret");

        let budgets = gateway.list_budgets().await.unwrap();

        assert_eq!(budgets.len(), 2);
        assert_eq!(budgets[1].id, Some(2));
        assert_eq!(budgets[0].remaining(), Decimal::from(1800));
    }

    #[tokio::test]
    async fn gets_budget_by_id() {
        let router = Router::new().route(
            "/api/budgets/{id}",
            get(|Path(id): Path<i64>| async move { Json(budget_json(id)) }),
        );
        let base_url = serve(router).await;
        let (gateway, _) = logged_in_gateway(&base_url, "user", "secret");

        let budget = gateway.get_budget(42).await.unwrap();

        assert_eq!(budget.id, Some(42));
    }

    #[tokio::test]
    async fn missing_budget_is_validation_failure() {
        let router = Router::new().route(
            "/api/budgets/{id}",
            get(|| async { StatusCode::NOT_FOUND }),
        );
        let base_url = serve(router).await;
        let (gateway, _) = logged_in_gateway(&base_url, "user", "secret");

        let result = gateway.get_budget(42).await;

        assert_eq!(
            result,
            Err(Error::ValidationFailure {
                status: 404,
                message: "Not Found".to_owned(),
            })
        );
    }

    #[tokio::test]
    async fn linked_budget_is_fetched() {
        let router = Router::new().route(
            "/api/budgets/{id}",
            get(|Path(id): Path<i64>| async move { Json(budget_json(id)) }),
        );
        let base_url = serve(router).await;
        let (gateway, _) = logged_in_gateway(&base_url, "user", "secret");

        let budget = gateway
            .get_linked_budget(&transaction_linked_to(Some(2)))
            .await
            .unwrap();
        let unlinked = gateway
            .get_linked_budget(&transaction_linked_to(None))
            .await
            .unwrap();

        assert_eq!(budget.and_then(|budget| budget.id), Some(2));
        assert_eq!(unlinked, None);
    }

    #[tokio::test]
    async fn dangling_link_has_no_budget() {
        let router = Router::new().route(
            "/api/budgets/{id}",
            get(|| async { StatusCode::NOT_FOUND }),
        );
        let base_url = serve(router).await;
        let (gateway, _) = logged_in_gateway(&base_url, "user", "secret");

        let budget = gateway
            .get_linked_budget(&transaction_linked_to(Some(99)))
            .await;

        assert_eq!(budget, Ok(None));
    }

    #[tokio::test]
    async fn linked_budget_errors_are_not_swallowed() {
        let router = Router::new()
            .route("/api/budgets/1", get(|| async { StatusCode::UNAUTHORIZED }))
            .route(
                "/api/budgets/2",
                get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            );
        let base_url = serve(router).await;
        let (gateway, _) = logged_in_gateway(&base_url, "user", "secret");

        let server_error = gateway
            .get_linked_budget(&transaction_linked_to(Some(2)))
            .await;
        let rejected = gateway
            .get_linked_budget(&transaction_linked_to(Some(1)))
            .await;

        assert!(
            matches!(server_error, Err(Error::ServerFailure { status: 500, .. })),
            "{server_error:?}"
        );
        assert_eq!(rejected, Err(Error::AuthorizationFailure { status: 401 }));
        assert!(!gateway.session().session().unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn create_sends_only_writable_fields() {
        let received = Arc::new(Mutex::new(None));
        let router = Router::new()
            .route(
                "/api/budgets",
                axum::routing::post(
                    |State(received): State<Arc<Mutex<Option<Value>>>>,
                     Json(body): Json<Value>| async move {
                        *received.lock().unwrap() = Some(body.clone());
                        let mut saved = body;
                        saved["id"] = json!(9);
                        saved["spent"] = json!(0);
                        (StatusCode::CREATED, Json(saved))
                    },
                ),
            )
            .with_state(received.clone());
        let base_url = serve(router).await;
        let (gateway, _) = logged_in_gateway(&base_url, "user", "secret");
        let draft =
            BudgetDraft::new("Cloud Compute", "Infrastructure", Decimal::from(5000)).unwrap();

        let budget = gateway.create_budget(&draft).await.unwrap();

        assert_eq!(
            received.lock().unwrap().clone(),
            Some(json!({"name": "Cloud Compute", "category": "Infrastructure", "amount": 5000.0}))
        );
        assert_eq!(
            budget,
            Budget {
                id: Some(9),
                name: "Cloud Compute".to_owned(),
                category: "Infrastructure".to_owned(),
                amount: Decimal::from(5000),
                spent: Decimal::ZERO,
            }
        );
    }

    #[tokio::test]
    async fn updates_budget_at_its_path() {
        let router = Router::new().route(
            "/api/budgets/{id}",
            axum::routing::put(|Path(id): Path<i64>, Json(body): Json<Value>| async move {
                let mut saved = body;
                saved["id"] = json!(id);
                saved["spent"] = json!("1600.00");
                Json(saved)
            }),
        );
        let base_url = serve(router).await;
        let (gateway, _) = logged_in_gateway(&base_url, "user", "secret");
        let draft = BudgetDraft::new("Software", "Licences", Decimal::from(1500)).unwrap();

        let budget = gateway.update_budget(3, &draft).await.unwrap();

        assert_eq!(budget.id, Some(3));
        assert!(budget.is_overspent());
    }

    #[tokio::test]
    async fn deletes_budget_with_no_content_response() {
        let router = Router::new().route(
            "/api/budgets/{id}",
            axum::routing::delete(|| async { StatusCode::NO_CONTENT }),
        );
        let base_url = serve(router).await;
        let (gateway, _) = logged_in_gateway(&base_url, "user", "secret");

        assert_eq!(gateway.delete_budget(3).await, Ok(()));
    }

    #[tokio::test]
    async fn fetches_summary() {
        let router = Router::new()
            .route(
                "/api/budgets/summary",
                get(|| async {
                    Json(json!({
                        "totalBudgeted": 14500.00,
                        "totalSpent": 12800.00,
                        "totalRemaining": 1700.00,
                        "overBudgetCount": 1,
                        "totalBudgets": 3
                    }))
                }),
            )
            .route(
                "/api/budgets/{id}",
                get(|| async { StatusCode::BAD_REQUEST }),
            );
        let base_url = serve(router).await;
        let (gateway, _) = logged_in_gateway(&base_url, "user", "secret");

        let summary = gateway.budget_summary().await.unwrap();

        assert_eq!(summary.total_remaining, Decimal::from_str("1700").unwrap());
        assert_eq!(summary.total_budgets, 3);
    }
}
