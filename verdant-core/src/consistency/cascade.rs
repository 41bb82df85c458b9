use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::consistency::validation;
use crate::database::ports::{farms::FarmsRepository, users::UsersRepository};
use crate::error::{CatalogError, Result};
use verdant_model::{
    FarmFields, FarmFilter, FarmID, FarmRecord, FarmWithOwner, NewFarm, UserFields, UserID,
    UserRecord, UserWithFarms,
};

/// Result of removing a user together with the farms it owned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeOutcome {
    pub farms_deleted: u64,
    pub cascaded_farms_deleted: bool,
}

/// Keeps users and farms consistent: unique emails on write, and no farm
/// left pointing at a removed user.
#[derive(Clone)]
pub struct CascadeManager {
    users: Arc<dyn UsersRepository>,
    farms: Arc<dyn FarmsRepository>,
}

impl fmt::Debug for CascadeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CascadeManager")
            .field("users_repo", &Arc::strong_count(&self.users))
            .field("farms_repo", &Arc::strong_count(&self.farms))
            .finish()
    }
}

impl CascadeManager {
    pub fn new(users: Arc<dyn UsersRepository>, farms: Arc<dyn FarmsRepository>) -> Self {
        Self { users, farms }
    }

    /// Remove every farm owned by `user_id`, then the user.
    ///
    /// The user is only touched once the farm delete succeeded. If the user
    /// turns out not to exist the farms are already gone and `NotFound` is
    /// returned.
    pub async fn delete_user(&self, user_id: UserID) -> Result<CascadeOutcome> {
        let farms_deleted = self
            .farms
            .delete_farms(FarmFilter::OwnedBy(user_id))
            .await
            .inspect_err(|err| {
                warn!(%user_id, error = %err, "farm cascade failed; user left in place");
            })?;

        match self.users.delete_user(user_id).await? {
            Some(_) => {
                info!(%user_id, farms_deleted, "deleted user and owned farms");
                Ok(CascadeOutcome {
                    farms_deleted,
                    cascaded_farms_deleted: true,
                })
            }
            None => Err(CatalogError::not_found("User not found")),
        }
    }

    pub async fn create_user(&self, fields: &UserFields) -> Result<UserRecord> {
        let user = validation::new_user(fields)?;

        if self.users.find_user_by_email(&user.email, None).await?.is_some() {
            return Err(CatalogError::conflict("User with this email already exists"));
        }

        let record = self.users.insert_user(&user).await?;
        info!(user_id = %record.id, "created user");
        Ok(record)
    }

    pub async fn update_user(&self, user_id: UserID, fields: &UserFields) -> Result<UserRecord> {
        let user = validation::new_user(fields)?;

        if self
            .users
            .find_user_by_email(&user.email, Some(user_id))
            .await?
            .is_some()
        {
            return Err(CatalogError::conflict(
                "Another user with this email already exists",
            ));
        }

        self.users
            .update_user(user_id, &user)
            .await?
            .ok_or_else(|| CatalogError::not_found("User not found"))
    }

    pub async fn create_farm(&self, fields: &FarmFields) -> Result<FarmRecord> {
        let farm = validation::new_farm(fields)?;
        self.ensure_owner_exists(&farm).await?;

        if self.farms.find_farm_by_email(&farm.email, None).await?.is_some() {
            return Err(CatalogError::conflict("Farm with this email already exists"));
        }

        let record = self.farms.insert_farm(&farm).await?;
        info!(farm_id = %record.id, owner_id = ?record.owner_id, "created farm");
        Ok(record)
    }

    pub async fn update_farm(&self, farm_id: FarmID, fields: &FarmFields) -> Result<FarmRecord> {
        let farm = validation::new_farm(fields)?;
        self.ensure_owner_exists(&farm).await?;

        if self
            .farms
            .find_farm_by_email(&farm.email, Some(farm_id))
            .await?
            .is_some()
        {
            return Err(CatalogError::conflict(
                "Another farm with this email already exists",
            ));
        }

        self.farms
            .update_farm(farm_id, &farm)
            .await?
            .ok_or_else(|| CatalogError::not_found("Farm not found"))
    }

    pub async fn delete_farm(&self, farm_id: FarmID) -> Result<FarmRecord> {
        let removed = self
            .farms
            .delete_farm(farm_id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Farm not found"))?;
        info!(%farm_id, "deleted farm");
        Ok(removed)
    }

    /// Users newest first, each with the farms it owns.
    pub async fn list_users_with_farms(&self) -> Result<Vec<UserWithFarms>> {
        let users = self.users.list_users().await?;
        let mut owned: HashMap<UserID, Vec<FarmRecord>> = HashMap::new();
        for farm in self.farms.list_farms(FarmFilter::All).await? {
            if let Some(owner) = farm.owner_id {
                owned.entry(owner).or_default().push(farm);
            }
        }

        Ok(users
            .into_iter()
            .map(|user| UserWithFarms {
                farms: owned.remove(&user.id).unwrap_or_default(),
                user,
            })
            .collect())
    }

    /// Farms newest first with their owner resolved. Owner lookup is best
    /// effort: if users cannot be read every owner is reported as `None`.
    pub async fn list_farms_with_owners(&self) -> Result<Vec<FarmWithOwner>> {
        let farms = self.farms.list_farms(FarmFilter::All).await?;
        let users: HashMap<UserID, UserRecord> = match self.users.list_users().await {
            Ok(users) => users.into_iter().map(|user| (user.id, user)).collect(),
            Err(err) => {
                warn!(error = %err, "could not load farm owners; listing farms without them");
                HashMap::new()
            }
        };

        Ok(farms
            .into_iter()
            .map(|farm| FarmWithOwner {
                owner: farm.owner_id.and_then(|id| users.get(&id).cloned()),
                farm,
            })
            .collect())
    }

    async fn ensure_owner_exists(&self, farm: &NewFarm) -> Result<()> {
        let Some(owner_id) = farm.owner_id else {
            return Ok(());
        };
        if self.users.get_user(owner_id).await?.is_none() {
            return Err(CatalogError::validation(format!(
                "Owner {owner_id} does not exist"
            )));
        }
        Ok(())
    }
}
