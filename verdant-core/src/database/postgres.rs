use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::database::infrastructure::postgres::repositories::{
    PostgresFarmsRepository, PostgresUsersRepository, PostgresVarietiesRepository,
};
use crate::error::{CatalogError, Result};

/// Connection settings for [`PostgresDatabase::connect`].
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Postgres adapter owning the connection pool the repositories share.
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

impl PostgresDatabase {
    pub async fn connect(connection_string: &str, settings: &PoolSettings) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(connection_string)
            .await
            .map_err(|e| CatalogError::store(format!("Failed to connect to PostgreSQL: {e}")))?;

        info!(
            max_connections = settings.max_connections,
            "PostgreSQL pool established"
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip a trivial query to confirm the store is reachable.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| CatalogError::store(format!("PostgreSQL ping failed: {e}")))?;
        Ok(())
    }

    pub fn varieties_repository(&self) -> Arc<PostgresVarietiesRepository> {
        Arc::new(PostgresVarietiesRepository::new(self.pool.clone()))
    }

    pub fn users_repository(&self) -> Arc<PostgresUsersRepository> {
        Arc::new(PostgresUsersRepository::new(self.pool.clone()))
    }

    pub fn farms_repository(&self) -> Arc<PostgresFarmsRepository> {
        Arc::new(PostgresFarmsRepository::new(self.pool.clone()))
    }
}
