//! Store ports and their adapters.

#[cfg(feature = "database")]
pub mod context;
#[cfg(feature = "database")]
pub mod infrastructure;
pub mod memory;
pub mod ports;
#[cfg(feature = "database")]
pub mod postgres;

#[cfg(feature = "database")]
pub use context::DatabaseContext;
pub use memory::{InMemoryCatalogStore, StoreOp};
#[cfg(feature = "database")]
pub use postgres::{PoolSettings, PostgresDatabase};
