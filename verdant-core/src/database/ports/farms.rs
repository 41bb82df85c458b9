use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::Result;
use verdant_model::{FarmFilter, FarmID, FarmRecord, NewFarm};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait FarmsRepository: Send + Sync {
    /// Farms matching `filter`, newest first.
    async fn list_farms(&self, filter: FarmFilter) -> Result<Vec<FarmRecord>>;

    /// Delete every farm matching `filter`, returning the affected row count.
    /// Deleting nothing is not an error.
    async fn delete_farms(&self, filter: FarmFilter) -> Result<u64>;

    /// A farm with this exact email, ignoring `exclude` when given.
    async fn find_farm_by_email(
        &self,
        email: &str,
        exclude: Option<FarmID>,
    ) -> Result<Option<FarmRecord>>;

    async fn insert_farm(&self, farm: &NewFarm) -> Result<FarmRecord>;

    /// Returns `None` when no farm has this id.
    async fn update_farm(&self, id: FarmID, farm: &NewFarm) -> Result<Option<FarmRecord>>;

    /// Returns the removed row, or `None` when no farm has this id.
    async fn delete_farm(&self, id: FarmID) -> Result<Option<FarmRecord>>;
}
