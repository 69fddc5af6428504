//! Lending repository: lend, return and delete as single transactions
//!
//! Every mutation pairs a change to `books.quantity` with a change to
//! `lending_records`. Both statements run in one transaction; an early return
//! drops the uncommitted `sqlx::Transaction`, which rolls it back, so callers
//! never observe one half without the other.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::lending::{DeletedRecord, LendingQuery, LendingRecord, LendingRecordDetail, LendingStatus},
};

const RECORD_COLUMNS: &str =
    "id, book_id, borrower_name, borrow_date, return_date, created_at, updated_at";

/// Storage operations backing the lending workflow
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LendingStore: Send + Sync {
    /// Take one copy of `book_id` off the shelf and open a record for `borrower`
    async fn lend(&self, book_id: i32, borrower: &str, borrow_date: NaiveDate) -> AppResult<LendingRecord>;

    /// Close an open record and put its copy back on the shelf
    async fn return_record(&self, record_id: i32, return_date: NaiveDate) -> AppResult<LendingRecord>;

    /// Remove a record, restoring its copy if it was still open
    async fn delete_record(&self, record_id: i32) -> AppResult<DeletedRecord>;

    /// Records joined with their book, newest first
    async fn list(&self, query: &LendingQuery) -> AppResult<Vec<LendingRecordDetail>>;
}

#[derive(Clone)]
pub struct LendingRepository {
    pool: Pool<Postgres>,
}

impl LendingRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LendingStore for LendingRepository {
    async fn lend(&self, book_id: i32, borrower: &str, borrow_date: NaiveDate) -> AppResult<LendingRecord> {
        let mut tx = self.pool.begin().await?;

        // Row lock held until commit: concurrent lends of this book queue here
        let quantity: i32 = sqlx::query_scalar("SELECT quantity FROM books WHERE id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        if quantity <= 0 {
            return Err(AppError::Conflict("Book is currently out of stock".to_string()));
        }

        sqlx::query("UPDATE books SET quantity = quantity - 1, updated_at = NOW() WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        let record = sqlx::query_as::<_, LendingRecord>(&format!(
            r#"
            INSERT INTO lending_records (book_id, borrower_name, borrow_date)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            RECORD_COLUMNS
        ))
        .bind(book_id)
        .bind(borrower)
        .bind(borrow_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn return_record(&self, record_id: i32, return_date: NaiveDate) -> AppResult<LendingRecord> {
        let mut tx = self.pool.begin().await?;

        // Compare-and-set: only an open record can be closed
        let closed = sqlx::query_as::<_, LendingRecord>(&format!(
            r#"
            UPDATE lending_records
            SET return_date = $1, updated_at = NOW()
            WHERE id = $2 AND return_date IS NULL
            RETURNING {}
            "#,
            RECORD_COLUMNS
        ))
        .bind(return_date)
        .bind(record_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(record) = closed else {
            let already_returned: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM lending_records WHERE id = $1 AND return_date IS NOT NULL)",
            )
            .bind(record_id)
            .fetch_one(&mut *tx)
            .await?;

            return Err(if already_returned {
                AppError::Conflict("Book already returned".to_string())
            } else {
                AppError::NotFound(format!("Lending record with id {} not found", record_id))
            });
        };

        let updated = sqlx::query("UPDATE books SET quantity = quantity + 1, updated_at = NOW() WHERE id = $1")
            .bind(record.book_id)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::Internal(format!(
                "Book {} of lending record {} disappeared during return",
                record.book_id, record_id
            )));
        }

        tx.commit().await?;

        Ok(record)
    }

    async fn delete_record(&self, record_id: i32) -> AppResult<DeletedRecord> {
        let mut tx = self.pool.begin().await?;

        // Locking read: a concurrent return of this record waits for us (or we for it)
        let (book_id, return_date): (i32, Option<NaiveDate>) = sqlx::query_as(
            "SELECT book_id, return_date FROM lending_records WHERE id = $1 FOR UPDATE",
        )
        .bind(record_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lending record with id {} not found", record_id)))?;

        let deleted = sqlx::query("DELETE FROM lending_records WHERE id = $1")
            .bind(record_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Lending record with id {} not found", record_id)));
        }

        let restored_copy = return_date.is_none();
        if restored_copy {
            let updated = sqlx::query("UPDATE books SET quantity = quantity + 1, updated_at = NOW() WHERE id = $1")
                .bind(book_id)
                .execute(&mut *tx)
                .await?;

            if updated.rows_affected() == 0 {
                return Err(AppError::Internal(format!(
                    "Book {} of lending record {} disappeared during delete",
                    book_id, record_id
                )));
            }
        }

        tx.commit().await?;

        Ok(DeletedRecord {
            id: record_id,
            book_id,
            restored_copy,
        })
    }

    async fn list(&self, query: &LendingQuery) -> AppResult<Vec<LendingRecordDetail>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT lr.id, lr.book_id, lr.borrower_name, lr.borrow_date, lr.return_date,
                   lr.created_at, lr.updated_at,
                   b.title AS book_title, b.author AS book_author
            FROM lending_records lr
            JOIN books b ON lr.book_id = b.id
            WHERE 1=1
            "#,
        );

        if let Some(search) = non_empty(&query.search) {
            let pattern = format!("%{}%", search);
            builder
                .push(" AND (LOWER(lr.borrower_name) LIKE LOWER(")
                .push_bind(pattern.clone())
                .push(") OR LOWER(b.title) LIKE LOWER(")
                .push_bind(pattern)
                .push("))");
        }

        if let Some(borrower) = non_empty(&query.borrower) {
            builder
                .push(" AND LOWER(lr.borrower_name) = LOWER(")
                .push_bind(borrower.to_string())
                .push(")");
        }

        match query.status {
            Some(LendingStatus::Active) => {
                builder.push(" AND lr.return_date IS NULL");
            }
            Some(LendingStatus::Returned) => {
                builder.push(" AND lr.return_date IS NOT NULL");
            }
            None => {}
        }

        if let Some(title) = non_empty(&query.book_title) {
            builder
                .push(" AND LOWER(b.title) = LOWER(")
                .push_bind(title.to_string())
                .push(")");
        }

        builder.push(" ORDER BY lr.borrow_date DESC, lr.created_at DESC");

        let records = builder
            .build_query_as::<LendingRecordDetail>()
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }
}

/// Trimmed filter value, ignoring blanks
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
