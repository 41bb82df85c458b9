use thiserror::Error;

/// Failure kinds surfaced by the consistency engine and its store adapters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Caller input is missing or malformed.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A uniqueness rule would be violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A consolidation plan no longer matches the catalog it was computed from.
    #[error("Stale consolidation plan: {} group(s) changed since scan", groups.len())]
    StalePlan { groups: Vec<String> },

    /// The record store could not be reached or the call failed.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl CatalogError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::StoreUnavailable(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        CatalogError::StoreUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
