//! Lending service: input checks, deadlines and logging around the store

use std::{future::Future, sync::Arc, time::Duration};

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::lending::{DeletedRecord, LendRequest, LendingQuery, LendingRecord, LendingRecordDetail},
    repository::lending::LendingStore,
};

#[derive(Clone)]
pub struct LendingService {
    store: Arc<dyn LendingStore>,
    transaction_timeout: Duration,
}

impl LendingService {
    pub fn new(store: Arc<dyn LendingStore>, transaction_timeout: Duration) -> Self {
        Self {
            store,
            transaction_timeout,
        }
    }

    /// Lend one copy of a book. Invalid input is rejected before any transaction opens.
    pub async fn lend(&self, request: LendRequest) -> AppResult<LendingRecord> {
        let request = request.normalized();
        request.validate()?;

        let today = Utc::now().date_naive();
        let result = self
            .bounded("lend", self.store.lend(request.book_id, &request.borrower, today))
            .await;

        match &result {
            Ok(record) => tracing::info!(
                record_id = record.id,
                book_id = record.book_id,
                "Book lent to {}",
                record.borrower
            ),
            Err(AppError::Conflict(msg)) => {
                tracing::warn!(book_id = request.book_id, "Lend refused: {}", msg)
            }
            Err(_) => {}
        }

        result
    }

    /// Close an open lending record and restore its copy
    pub async fn return_record(&self, record_id: i32) -> AppResult<LendingRecord> {
        require_positive_id(record_id)?;

        let today = Utc::now().date_naive();
        let result = self
            .bounded("return", self.store.return_record(record_id, today))
            .await;

        match &result {
            Ok(record) => tracing::info!(record_id, book_id = record.book_id, "Book returned"),
            Err(AppError::Conflict(msg)) => tracing::warn!(record_id, "Return refused: {}", msg),
            Err(_) => {}
        }

        result
    }

    /// Delete a lending record, restoring its copy if it was still on loan
    pub async fn delete_record(&self, record_id: i32) -> AppResult<DeletedRecord> {
        require_positive_id(record_id)?;

        let deleted = self
            .bounded("delete", self.store.delete_record(record_id))
            .await?;

        tracing::info!(
            record_id,
            book_id = deleted.book_id,
            restored_copy = deleted.restored_copy,
            "Lending record deleted"
        );

        Ok(deleted)
    }

    /// List lending records with optional filters
    pub async fn list(&self, query: &LendingQuery) -> AppResult<Vec<LendingRecordDetail>> {
        self.store.list(query).await
    }

    /// Run one store operation under the transaction deadline. On expiry the
    /// operation future is dropped, which rolls its transaction back.
    async fn bounded<T>(
        &self,
        operation: &str,
        fut: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        match tokio::time::timeout(self.transaction_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    "Lending {} exceeded {:?} and was rolled back",
                    operation,
                    self.transaction_timeout
                );
                Err(AppError::Timeout(format!(
                    "Lending {} did not complete in time, please retry",
                    operation
                )))
            }
        }
    }
}

fn require_positive_id(record_id: i32) -> AppResult<()> {
    if record_id <= 0 {
        return Err(AppError::Validation(
            "Lending record ID must be a positive integer".to_string(),
        ));
    }
    Ok(())
}
