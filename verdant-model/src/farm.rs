use chrono::{DateTime, Utc};

use crate::ids::{FarmID, UserID};
use crate::user::UserRecord;

/// A farm. `email` is unique across farms; `owner_id` is a weak reference
/// to a [`UserRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FarmRecord {
    pub id: FarmID,
    pub name: String,
    pub email: String,
    pub owner_id: Option<UserID>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub owner_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied farm payload for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FarmFields {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub email: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub owner_id: Option<UserID>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub phone: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub website: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub address: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub owner_name: Option<String>,
}

/// A validated farm write, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFarm {
    pub name: String,
    pub email: String,
    pub owner_id: Option<UserID>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub owner_name: Option<String>,
}

/// Selects farms for listing and bulk deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FarmFilter {
    #[default]
    All,
    OwnedBy(UserID),
}

impl FarmFilter {
    pub fn matches(&self, farm: &FarmRecord) -> bool {
        match self {
            FarmFilter::All => true,
            FarmFilter::OwnedBy(owner) => farm.owner_id == Some(*owner),
        }
    }
}

/// A farm with its owner resolved, if the owner could be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FarmWithOwner {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub farm: FarmRecord,
    pub owner: Option<UserRecord>,
}
