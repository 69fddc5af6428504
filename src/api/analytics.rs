//! Analytics endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::analytics::{BorrowCount, CategoryDistribution, MonthlyTrend, MostBorrowedQuery},
    AppState,
};

use super::{AppQuery, AuthenticatedUser};

/// Most borrowed books
#[utoipa::path(
    get,
    path = "/analytics/most-borrowed",
    tag = "analytics",
    security(("bearer_auth" = [])),
    params(MostBorrowedQuery),
    responses(
        (status = 200, description = "Books ordered by number of loans", body = Vec<BorrowCount>)
    )
)]
pub async fn most_borrowed(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    AppQuery(query): AppQuery<MostBorrowedQuery>,
) -> AppResult<Json<Vec<BorrowCount>>> {
    let rows = state.services.analytics.most_borrowed(query.limit()).await?;
    Ok(Json(rows))
}

/// Loans started per month
#[utoipa::path(
    get,
    path = "/analytics/monthly-trends",
    tag = "analytics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Loan counts by month", body = Vec<MonthlyTrend>)
    )
)]
pub async fn monthly_trends(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<MonthlyTrend>>> {
    let rows = state.services.analytics.monthly_trends().await?;
    Ok(Json(rows))
}

/// Catalog distribution across categories
#[utoipa::path(
    get,
    path = "/analytics/category-distribution",
    tag = "analytics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Book counts by category", body = Vec<CategoryDistribution>)
    )
)]
pub async fn category_distribution(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<CategoryDistribution>>> {
    let rows = state.services.analytics.category_distribution().await?;
    Ok(Json(rows))
}
