use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::Result;
use verdant_model::{VarietyID, VarietyOrder, VarietyRecord};

/// Read and bulk-delete access to the variety catalog.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VarietiesRepository: Send + Sync {
    /// All varieties with their category and subcategory names, in `order`.
    async fn list_varieties(&self, order: VarietyOrder) -> Result<Vec<VarietyRecord>>;

    /// Current rows for the given ids. Missing ids are simply absent from the
    /// result; the order of the result is unspecified.
    async fn get_varieties_by_ids(&self, ids: &[VarietyID]) -> Result<Vec<VarietyRecord>>;

    /// Delete every variety whose id is in `ids`, returning the affected row count.
    async fn delete_varieties(&self, ids: &[VarietyID]) -> Result<u64>;
}
