//! Catalog consistency engine for Verdant.
//!
//! Two components operate on the record store through injected ports:
//!
//! - [`DuplicateResolver`](consistency::DuplicateResolver) finds varieties
//!   sharing a `(name, category, subcategory)` key and consolidates each group
//!   to its first record.
//! - [`CascadeManager`](consistency::CascadeManager) removes a user's farms
//!   before the user and enforces unique emails on user and farm writes.
//!
//! Store access goes through the traits in [`database::ports`]; the Postgres
//! adapter lives behind the `database` feature and an in-memory store is
//! always available for tests and local runs.
#![allow(missing_docs)]

pub mod api_routes;
pub mod application;
pub mod consistency;
pub mod database;
pub mod error;

pub use application::unit_of_work::AppUnitOfWork;
pub use consistency::{CascadeManager, CascadeOutcome, DuplicateResolver, EquivalenceKey};
pub use error::{CatalogError, Result};
