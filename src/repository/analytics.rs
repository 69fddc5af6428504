//! Read-only aggregations over books and lending records

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::analytics::{BorrowCount, CategoryDistribution, MonthlyTrend},
};

#[derive(Clone)]
pub struct AnalyticsRepository {
    pool: Pool<Postgres>,
}

impl AnalyticsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Books ordered by how often they were lent
    pub async fn most_borrowed(&self, limit: i64) -> AppResult<Vec<BorrowCount>> {
        let rows = sqlx::query_as::<_, BorrowCount>(
            r#"
            SELECT b.id AS book_id, b.title AS book_title, COUNT(lr.id) AS borrows
            FROM books b
            JOIN lending_records lr ON b.id = lr.book_id
            GROUP BY b.id, b.title
            ORDER BY borrows DESC, b.title ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Loans started per month
    pub async fn monthly_trends(&self) -> AppResult<Vec<MonthlyTrend>> {
        let rows = sqlx::query_as::<_, MonthlyTrend>(
            r#"
            SELECT to_char(borrow_date, 'YYYY-MM') AS month, COUNT(*) AS count
            FROM lending_records
            GROUP BY month
            ORDER BY month ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Catalog entries per category
    pub async fn category_distribution(&self) -> AppResult<Vec<CategoryDistribution>> {
        let rows = sqlx::query_as::<_, CategoryDistribution>(
            r#"
            SELECT COALESCE(category, 'Uncategorized') AS category, COUNT(*) AS count
            FROM books
            GROUP BY COALESCE(category, 'Uncategorized')
            ORDER BY count DESC, category ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
