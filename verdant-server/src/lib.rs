//! # Verdant Server
//!
//! Administrative HTTP API over the Verdant catalog consistency engine:
//! duplicate variety consolidation, user and farm management with cascading
//! deletes, and catalog statistics.

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
