use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{fmt, time::Duration};
use tracing::info;

use crate::error::{CoreError, Result};

/// Statistics about the connection pool
#[derive(Debug, Clone)]
pub struct PoolStats {
    pub size: u32,
    pub idle: u32,
    pub max_size: u32,
}

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    max_connections: u32,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl PostgresDatabase {
    pub async fn new(connection_string: &str) -> Result<Self> {
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(10);

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(connection_string)
            .await
            .map_err(|e| {
                CoreError::Internal(format!(
                    "Database connection failed: {}",
                    e
                ))
            })?;

        info!(max_connections, "Database pool initialized");

        Ok(Self {
            pool,
            max_connections,
        })
    }

    /// Create a PostgresDatabase from an existing pool (mainly for testing)
    pub fn from_pool(pool: PgPool) -> Self {
        let max_connections = pool.options().get_max_connections();
        Self {
            pool,
            max_connections,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle() as u32,
            max_size: self.max_connections,
        }
    }

    /// Apply the embedded migrations.
    pub async fn initialize_schema(&self) -> Result<()> {
        crate::MIGRATOR.run(&self.pool).await.map_err(|e| {
            CoreError::Internal(format!("Migration failed: {}", e))
        })?;

        info!("Database migrations applied");
        Ok(())
    }

    /// Single round-trip used by the health endpoint.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| {
                CoreError::Internal(format!("Database health check failed: {}", e))
            })
    }
}
