//! Analytics service

use crate::{
    error::AppResult,
    models::analytics::{BorrowCount, CategoryDistribution, MonthlyTrend},
    repository::Repository,
};

#[derive(Clone)]
pub struct AnalyticsService {
    repository: Repository,
}

impl AnalyticsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn most_borrowed(&self, limit: i64) -> AppResult<Vec<BorrowCount>> {
        self.repository.analytics.most_borrowed(limit).await
    }

    pub async fn monthly_trends(&self) -> AppResult<Vec<MonthlyTrend>> {
        self.repository.analytics.monthly_trends().await
    }

    pub async fn category_distribution(&self) -> AppResult<Vec<CategoryDistribution>> {
        self.repository.analytics.category_distribution().await
    }
}
