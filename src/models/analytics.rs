//! Analytics result rows

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Number of times a book has been lent
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowCount {
    pub book_id: i32,
    pub book_title: String,
    pub borrows: i64,
}

/// Loans started in a month
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MonthlyTrend {
    /// YYYY-MM
    pub month: String,
    pub count: i64,
}

/// Number of catalog entries per category
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CategoryDistribution {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MostBorrowedQuery {
    /// Number of books to return (1-100, default 10)
    pub limit: Option<i64>,
}

impl MostBorrowedQuery {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 100;

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}
