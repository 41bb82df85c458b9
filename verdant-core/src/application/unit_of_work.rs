use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use crate::database::memory::InMemoryCatalogStore;
use crate::database::ports::{
    farms::FarmsRepository, users::UsersRepository, varieties::VarietiesRepository,
};
#[cfg(feature = "database")]
use crate::database::postgres::PostgresDatabase;

/// Aggregates the store ports the consistency engine works against.
///
/// Handed to the engine explicitly; there is no process-wide store handle.
#[derive(Clone)]
pub struct AppUnitOfWork {
    pub varieties: Arc<dyn VarietiesRepository>,
    pub users: Arc<dyn UsersRepository>,
    pub farms: Arc<dyn FarmsRepository>,
}

impl fmt::Debug for AppUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWork")
            .field("varieties", &type_name_of_val(self.varieties.as_ref()))
            .field("users", &type_name_of_val(self.users.as_ref()))
            .field("farms", &type_name_of_val(self.farms.as_ref()))
            .finish()
    }
}

impl AppUnitOfWork {
    #[cfg(feature = "database")]
    pub fn from_postgres(postgres: Arc<PostgresDatabase>) -> Self {
        Self {
            varieties: postgres.varieties_repository(),
            users: postgres.users_repository(),
            farms: postgres.farms_repository(),
        }
    }

    /// Every port served by one shared in-memory store.
    pub fn in_memory(store: InMemoryCatalogStore) -> Self {
        let store = Arc::new(store);
        Self {
            varieties: store.clone(),
            users: store.clone(),
            farms: store,
        }
    }
}
