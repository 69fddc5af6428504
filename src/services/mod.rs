//! Business logic services

pub mod analytics;
pub mod auth;
pub mod catalog;
pub mod lending;

use std::sync::Arc;

use crate::{
    config::{AuthConfig, LendingConfig},
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub lending: lending::LendingService,
    pub analytics: analytics::AnalyticsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, lending_config: &LendingConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            lending: lending::LendingService::new(
                Arc::new(repository.lending.clone()),
                lending_config.transaction_timeout(),
            ),
            analytics: analytics::AnalyticsService::new(repository.clone()),
            repository,
        }
    }

    /// Check that the database answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await?;
        Ok(())
    }
}
