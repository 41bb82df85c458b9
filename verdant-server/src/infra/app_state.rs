use std::{fmt, sync::Arc};

use crate::infra::config::Config;
use verdant_core::application::unit_of_work::AppUnitOfWork;
use verdant_core::consistency::{CascadeManager, DuplicateResolver};
use verdant_core::database::PostgresDatabase;

#[derive(Clone)]
pub struct AppState {
    pub unit_of_work: Arc<AppUnitOfWork>,
    /// Present when the ports are backed by Postgres; used for health checks.
    pub postgres: Option<Arc<PostgresDatabase>>,
    pub config: Arc<Config>,
    pub duplicates: DuplicateResolver,
    pub cascade: CascadeManager,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        unit_of_work: Arc<AppUnitOfWork>,
        postgres: Option<Arc<PostgresDatabase>>,
    ) -> Self {
        let duplicates = DuplicateResolver::new(unit_of_work.varieties.clone());
        let cascade = CascadeManager::new(unit_of_work.users.clone(), unit_of_work.farms.clone());
        Self {
            unit_of_work,
            postgres,
            config,
            duplicates,
            cascade,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
