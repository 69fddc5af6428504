//! Data models for the digital library

pub mod analytics;
pub mod book;
pub mod lending;
pub mod user;

// Re-export commonly used types
pub use book::Book;
pub use lending::{LendingRecord, LendingRecordDetail};
pub use user::{User, UserClaims};
