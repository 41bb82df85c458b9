//! Layered configuration: `.env`, an optional TOML file, then environment
//! overrides.

pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader};
pub use models::{Config, ConfigMetadata, CorsConfig, DatabaseConfig, ServerConfig};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
