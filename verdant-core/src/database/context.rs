use std::fmt;
use std::sync::Arc;

use crate::application::unit_of_work::AppUnitOfWork;
use crate::database::postgres::{PoolSettings, PostgresDatabase};
use crate::error::Result;

/// Bundles the Postgres adapter with the unit of work composed over it.
///
/// Callers grab the ports they need through [`AppUnitOfWork`] while the raw
/// adapter stays available for infra concerns such as health checks.
#[derive(Clone)]
pub struct DatabaseContext {
    postgres: Arc<PostgresDatabase>,
    unit_of_work: Arc<AppUnitOfWork>,
}

impl fmt::Debug for DatabaseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseContext")
            .field("postgres_ptr", &Arc::as_ptr(&self.postgres))
            .field("unit_of_work_ptr", &Arc::as_ptr(&self.unit_of_work))
            .finish()
    }
}

impl DatabaseContext {
    /// Establish a PostgreSQL connection and compose the default unit of work.
    pub async fn connect_postgres(
        connection_string: &str,
        settings: &PoolSettings,
    ) -> Result<Self> {
        let postgres = Arc::new(PostgresDatabase::connect(connection_string, settings).await?);
        Ok(Self::from_postgres(postgres))
    }

    pub fn from_postgres(postgres: Arc<PostgresDatabase>) -> Self {
        let unit_of_work = Arc::new(AppUnitOfWork::from_postgres(postgres.clone()));
        Self {
            postgres,
            unit_of_work,
        }
    }

    pub fn unit_of_work(&self) -> Arc<AppUnitOfWork> {
        Arc::clone(&self.unit_of_work)
    }

    pub fn postgres(&self) -> Arc<PostgresDatabase> {
        Arc::clone(&self.postgres)
    }
}
