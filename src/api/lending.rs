//! Lending endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::lending::{LendRequest, LendingQuery, LendingRecord, LendingRecordDetail},
    AppState,
};

use super::{AppJson, AppPath, AppQuery, AuthenticatedUser, MessageResponse};

/// Return response with the closed record
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub message: String,
    pub record: LendingRecord,
}

/// Lend a book
#[utoipa::path(
    post,
    path = "/lending/lend",
    tag = "lending",
    security(("bearer_auth" = [])),
    request_body = LendRequest,
    responses(
        (status = 201, description = "Book lent", body = LendingRecord),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Book is out of stock", body = crate::error::ErrorResponse)
    )
)]
pub async fn lend_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(request): AppJson<LendRequest>,
) -> AppResult<(StatusCode, Json<LendingRecord>)> {
    tracing::debug!(acting_user = %claims.username, book_id = request.book_id, "Lend requested");

    let record = state.services.lending.lend(request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Return a lent book
#[utoipa::path(
    post,
    path = "/lending/return/{id}",
    tag = "lending",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Lending record ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "Lending record not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Book already returned", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(record_id): AppPath<i32>,
) -> AppResult<Json<ReturnResponse>> {
    tracing::debug!(acting_user = %claims.username, record_id, "Return requested");

    let record = state.services.lending.return_record(record_id).await?;
    Ok(Json(ReturnResponse {
        message: "Book returned successfully".to_string(),
        record,
    }))
}

/// Delete a lending record
#[utoipa::path(
    delete,
    path = "/lending/{id}",
    tag = "lending",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Lending record ID")
    ),
    responses(
        (status = 200, description = "Lending record deleted", body = MessageResponse),
        (status = 404, description = "Lending record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_record(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(record_id): AppPath<i32>,
) -> AppResult<Json<MessageResponse>> {
    tracing::debug!(acting_user = %claims.username, record_id, "Delete requested");

    state.services.lending.delete_record(record_id).await?;
    Ok(Json(MessageResponse {
        message: "Lending record deleted successfully".to_string(),
    }))
}

/// List lending records
#[utoipa::path(
    get,
    path = "/lending",
    tag = "lending",
    security(("bearer_auth" = [])),
    params(LendingQuery),
    responses(
        (status = 200, description = "Lending records with book details", body = Vec<LendingRecordDetail>)
    )
)]
pub async fn list_records(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    AppQuery(query): AppQuery<LendingQuery>,
) -> AppResult<Json<Vec<LendingRecordDetail>>> {
    let records = state.services.lending.list(&query).await?;
    Ok(Json(records))
}
