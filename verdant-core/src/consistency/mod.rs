//! The catalog consistency engine: duplicate consolidation and referential
//! cascades over the injected record store.

pub mod cascade;
pub mod duplicates;
pub mod equivalence;
pub mod stats;
pub mod validation;

pub use cascade::{CascadeManager, CascadeOutcome};
pub use duplicates::DuplicateResolver;
pub use equivalence::EquivalenceKey;
