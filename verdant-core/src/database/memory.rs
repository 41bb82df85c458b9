//! In-memory record store.
//!
//! Implements every store port over plain vectors guarded by a mutex. It
//! enforces the same constraints the Postgres schema does (unique emails,
//! farm owner must exist, a user cannot be removed while farms reference it)
//! so engine behaviour observed against it carries over. Individual
//! operations can be forced to fail to exercise store-failure paths.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::database::ports::{
    farms::FarmsRepository, users::UsersRepository, varieties::VarietiesRepository,
};
use crate::error::{CatalogError, Result};
use verdant_model::{
    FarmFilter, FarmID, FarmRecord, NewFarm, NewUser, UserID, UserRecord, VarietyID,
    VarietyOrder, VarietyRecord,
};

/// Store operations that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ListVarieties,
    GetVarieties,
    DeleteVarieties,
    ListUsers,
    GetUser,
    FindUserByEmail,
    InsertUser,
    UpdateUser,
    DeleteUser,
    ListFarms,
    DeleteFarms,
    FindFarmByEmail,
    InsertFarm,
    UpdateFarm,
    DeleteFarm,
}

#[derive(Default)]
struct State {
    varieties: Vec<VarietyRecord>,
    // Insertion order; listings reverse it to get newest first.
    users: Vec<UserRecord>,
    farms: Vec<FarmRecord>,
    failing: HashSet<StoreOp>,
    calls: Vec<StoreOp>,
}

#[derive(Clone, Default)]
pub struct InMemoryCatalogStore {
    state: Arc<Mutex<State>>,
}

impl fmt::Debug for InMemoryCatalogStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryCatalogStore").finish_non_exhaustive()
    }
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed catalog rows. Varieties are owned by an external catalog surface,
    /// so this is the only way rows get into the in-memory catalog.
    pub async fn seed_varieties(&self, records: impl IntoIterator<Item = VarietyRecord>) {
        self.state.lock().await.varieties.extend(records);
    }

    /// Overwrite the stored copy of a variety, simulating an external edit.
    pub async fn replace_variety(&self, record: VarietyRecord) -> bool {
        let mut state = self.state.lock().await;
        match state.varieties.iter_mut().find(|row| row.id == record.id) {
            Some(row) => {
                *row = record;
                true
            }
            None => false,
        }
    }

    pub async fn variety_ids(&self) -> Vec<VarietyID> {
        let state = self.state.lock().await;
        let mut ids: Vec<_> = state.varieties.iter().map(|row| row.id).collect();
        ids.sort();
        ids
    }

    /// Make every subsequent call of `op` fail with `StoreUnavailable`.
    pub async fn fail_on(&self, op: StoreOp) {
        self.state.lock().await.failing.insert(op);
    }

    pub async fn clear_failures(&self) {
        self.state.lock().await.failing.clear();
    }

    /// Every operation invoked so far, in call order. Failed calls included.
    pub async fn calls(&self) -> Vec<StoreOp> {
        self.state.lock().await.calls.clone()
    }

    pub async fn reset_calls(&self) {
        self.state.lock().await.calls.clear();
    }

    async fn enter(&self, op: StoreOp) -> Result<tokio::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().await;
        state.calls.push(op);
        if state.failing.contains(&op) {
            debug!(?op, "injected store failure");
            return Err(CatalogError::store(format!("{op:?} failed")));
        }
        Ok(state)
    }
}

fn build_farm(id: FarmID, farm: &NewFarm, created_at: chrono::DateTime<Utc>) -> FarmRecord {
    FarmRecord {
        id,
        name: farm.name.clone(),
        email: farm.email.clone(),
        owner_id: farm.owner_id,
        description: farm.description.clone(),
        phone: farm.phone.clone(),
        website: farm.website.clone(),
        address: farm.address.clone(),
        owner_name: farm.owner_name.clone(),
        created_at,
        updated_at: Utc::now(),
    }
}

fn check_owner(state: &State, farm: &NewFarm) -> Result<()> {
    if let Some(owner) = farm.owner_id
        && !state.users.iter().any(|user| user.id == owner)
    {
        return Err(CatalogError::validation(format!(
            "Owner {owner} does not exist"
        )));
    }
    Ok(())
}

#[async_trait]
impl VarietiesRepository for InMemoryCatalogStore {
    async fn list_varieties(&self, order: VarietyOrder) -> Result<Vec<VarietyRecord>> {
        let state = self.enter(StoreOp::ListVarieties).await?;
        let mut rows = state.varieties.clone();
        match order {
            VarietyOrder::NameThenId => {
                rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)))
            }
            VarietyOrder::Name => rows.sort_by(|a, b| a.name.cmp(&b.name)),
        }
        Ok(rows)
    }

    async fn get_varieties_by_ids(&self, ids: &[VarietyID]) -> Result<Vec<VarietyRecord>> {
        let state = self.enter(StoreOp::GetVarieties).await?;
        let wanted: HashSet<&VarietyID> = ids.iter().collect();
        Ok(state
            .varieties
            .iter()
            .filter(|row| wanted.contains(&row.id))
            .cloned()
            .collect())
    }

    async fn delete_varieties(&self, ids: &[VarietyID]) -> Result<u64> {
        let mut state = self.enter(StoreOp::DeleteVarieties).await?;
        let doomed: HashSet<&VarietyID> = ids.iter().collect();
        let before = state.varieties.len();
        state.varieties.retain(|row| !doomed.contains(&row.id));
        Ok((before - state.varieties.len()) as u64)
    }
}

#[async_trait]
impl UsersRepository for InMemoryCatalogStore {
    async fn list_users(&self) -> Result<Vec<UserRecord>> {
        let state = self.enter(StoreOp::ListUsers).await?;
        Ok(state.users.iter().rev().cloned().collect())
    }

    async fn get_user(&self, id: UserID) -> Result<Option<UserRecord>> {
        let state = self.enter(StoreOp::GetUser).await?;
        Ok(state.users.iter().find(|user| user.id == id).cloned())
    }

    async fn find_user_by_email(
        &self,
        email: &str,
        exclude: Option<UserID>,
    ) -> Result<Option<UserRecord>> {
        let state = self.enter(StoreOp::FindUserByEmail).await?;
        Ok(state
            .users
            .iter()
            .find(|user| user.email == email && Some(user.id) != exclude)
            .cloned())
    }

    async fn insert_user(&self, user: &NewUser) -> Result<UserRecord> {
        let mut state = self.enter(StoreOp::InsertUser).await?;
        if state.users.iter().any(|row| row.email == user.email) {
            return Err(CatalogError::conflict("User with this email already exists"));
        }
        let now = Utc::now();
        let record = UserRecord {
            id: UserID::new(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            created_at: now,
            updated_at: now,
        };
        state.users.push(record.clone());
        Ok(record)
    }

    async fn update_user(&self, id: UserID, user: &NewUser) -> Result<Option<UserRecord>> {
        let mut state = self.enter(StoreOp::UpdateUser).await?;
        if state
            .users
            .iter()
            .any(|row| row.email == user.email && row.id != id)
        {
            return Err(CatalogError::conflict(
                "Another user with this email already exists",
            ));
        }
        Ok(state.users.iter_mut().find(|row| row.id == id).map(|row| {
            row.name = user.name.clone();
            row.email = user.email.clone();
            row.phone = user.phone.clone();
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn delete_user(&self, id: UserID) -> Result<Option<UserRecord>> {
        let mut state = self.enter(StoreOp::DeleteUser).await?;
        if state.farms.iter().any(|farm| farm.owner_id == Some(id)) {
            return Err(CatalogError::conflict(format!(
                "User {id} is still referenced by farms"
            )));
        }
        let position = state.users.iter().position(|user| user.id == id);
        Ok(position.map(|index| state.users.remove(index)))
    }
}

#[async_trait]
impl FarmsRepository for InMemoryCatalogStore {
    async fn list_farms(&self, filter: FarmFilter) -> Result<Vec<FarmRecord>> {
        let state = self.enter(StoreOp::ListFarms).await?;
        Ok(state
            .farms
            .iter()
            .rev()
            .filter(|farm| filter.matches(farm))
            .cloned()
            .collect())
    }

    async fn delete_farms(&self, filter: FarmFilter) -> Result<u64> {
        let mut state = self.enter(StoreOp::DeleteFarms).await?;
        let before = state.farms.len();
        state.farms.retain(|farm| !filter.matches(farm));
        Ok((before - state.farms.len()) as u64)
    }

    async fn find_farm_by_email(
        &self,
        email: &str,
        exclude: Option<FarmID>,
    ) -> Result<Option<FarmRecord>> {
        let state = self.enter(StoreOp::FindFarmByEmail).await?;
        Ok(state
            .farms
            .iter()
            .find(|farm| farm.email == email && Some(farm.id) != exclude)
            .cloned())
    }

    async fn insert_farm(&self, farm: &NewFarm) -> Result<FarmRecord> {
        let mut state = self.enter(StoreOp::InsertFarm).await?;
        if state.farms.iter().any(|row| row.email == farm.email) {
            return Err(CatalogError::conflict("Farm with this email already exists"));
        }
        check_owner(&state, farm)?;
        let record = build_farm(FarmID::new(), farm, Utc::now());
        state.farms.push(record.clone());
        Ok(record)
    }

    async fn update_farm(&self, id: FarmID, farm: &NewFarm) -> Result<Option<FarmRecord>> {
        let mut state = self.enter(StoreOp::UpdateFarm).await?;
        if state
            .farms
            .iter()
            .any(|row| row.email == farm.email && row.id != id)
        {
            return Err(CatalogError::conflict(
                "Another farm with this email already exists",
            ));
        }
        check_owner(&state, farm)?;
        Ok(state.farms.iter_mut().find(|row| row.id == id).map(|row| {
            *row = build_farm(id, farm, row.created_at);
            row.clone()
        }))
    }

    async fn delete_farm(&self, id: FarmID) -> Result<Option<FarmRecord>> {
        let mut state = self.enter(StoreOp::DeleteFarm).await?;
        let position = state.farms.iter().position(|farm| farm.id == id);
        Ok(position.map(|index| state.farms.remove(index)))
    }
}
