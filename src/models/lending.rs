//! Lending record model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Lending record from database
///
/// `return_date` is `None` while the copy is on loan. It is set exactly once,
/// by a return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LendingRecord {
    pub id: i32,
    pub book_id: i32,
    #[sqlx(rename = "borrower_name")]
    pub borrower: String,
    /// UTC day the copy left the shelf
    pub borrow_date: NaiveDate,
    /// UTC day the copy came back
    pub return_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LendingRecord {
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}

/// Lending record joined with the borrowed book
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LendingRecordDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub record: LendingRecord,
    pub book_title: String,
    pub book_author: String,
}

/// Lend request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LendRequest {
    /// Book to lend
    #[validate(range(min = 1, message = "Book ID must be a positive integer"))]
    pub book_id: i32,
    /// Borrower name, taken as supplied
    #[validate(length(min = 1, max = 255, message = "Borrower name is required (at most 255 characters)"))]
    pub borrower: String,
}

impl LendRequest {
    pub fn normalized(mut self) -> Self {
        self.borrower = self.borrower.trim().to_string();
        self
    }
}

/// Outcome of deleting a lending record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletedRecord {
    pub id: i32,
    pub book_id: i32,
    /// The record was still open, so one copy went back on the shelf
    pub restored_copy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LendingStatus {
    /// Still on loan
    Active,
    Returned,
}

/// Lending record query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct LendingQuery {
    /// Case-insensitive substring of borrower name or book title
    pub search: Option<String>,
    /// Exact borrower name (case-insensitive)
    pub borrower: Option<String>,
    pub status: Option<LendingStatus>,
    /// Exact book title (case-insensitive)
    #[serde(alias = "bookTitle")]
    pub book_title: Option<String>,
}
