//! Shared PostgreSQL connection pool for Commerce Insight services

use crate::config::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, Error as SqlxError, PgPool};
use tracing::info;

/// Shared database connection pool
#[derive(Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Create new database pool
    pub async fn new(config: &DatabaseConfig) -> Result<Self, SqlxError> {
        info!(
            "Connecting to database with max {} connections",
            config.max_connections
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .idle_timeout(Some(config.idle_timeout))
            .acquire_timeout(config.connect_timeout)
            .connect(&config.url)
            .await?;

        info!("Database connection pool established");
        Ok(Self { pool })
    }

    /// Get reference to underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check if pool is healthy
    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }

    /// Get pool statistics
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle(),
        }
    }
}

/// Pool statistics
#[derive(Debug, Clone)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
}
