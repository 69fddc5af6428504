//! Repository layer for database operations

pub mod analytics;
pub mod books;
pub mod lending;
pub mod users;

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use crate::config::DatabaseConfig;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub lending: lending::LendingRepository,
    pub users: users::UsersRepository,
    pub analytics: analytics::AnalyticsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            lending: lending::LendingRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            analytics: analytics::AnalyticsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Pool options built from the database section
pub fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
}

/// Open the connection pool, retrying transient failures
pub async fn connect(config: &DatabaseConfig) -> Result<Pool<Postgres>, sqlx::Error> {
    let attempts = config.connect_retries.max(1);
    let mut attempt = 1;

    loop {
        match pool_options(config).connect(&config.url).await {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt < attempts => {
                tracing::warn!(
                    "Attempt {}/{} to connect to database failed: {}",
                    attempt, attempts, e
                );
                tokio::time::sleep(Duration::from_secs(config.connect_retry_delay_secs)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
