//! Record-store ports (interfaces) grouped by entity.
//!
//! The consistency engine only talks to the store through these traits, so
//! it can be composed over Postgres in production and over the in-memory
//! store in tests. Implementations live in `database::infrastructure` and
//! `database::memory`.

pub mod farms;
pub mod users;
pub mod varieties;
