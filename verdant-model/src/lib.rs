//! Core data model definitions shared across Verdant crates.
#![allow(missing_docs)]

pub mod duplicates;
pub mod farm;
pub mod ids;
pub mod user;
pub mod variety;

pub use duplicates::{ApplyOutcome, ConsolidationPlan, DuplicateGroup, ScanReport};
pub use farm::{FarmFields, FarmFilter, FarmRecord, FarmWithOwner, NewFarm};
pub use ids::{FarmID, UserID, VarietyID};
pub use user::{NewUser, UserFields, UserRecord, UserWithFarms};
pub use variety::{VarietyOrder, VarietyRecord, VarietyStats};
