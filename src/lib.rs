//! Digital Library server
//!
//! A REST JSON API for a book catalog, lending records and lending
//! analytics, backed by PostgreSQL and protected by JWT authentication.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Wire repositories and services over an existing pool
    pub fn new(config: AppConfig, pool: sqlx::PgPool) -> Self {
        let repository = repository::Repository::new(pool);
        let services = services::Services::new(repository, config.auth.clone(), &config.lending);

        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
