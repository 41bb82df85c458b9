use chrono::{DateTime, Utc};

use crate::farm::FarmRecord;
use crate::ids::UserID;

/// A registered user. `email` is unique across users.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserRecord {
    pub id: UserID,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied user payload for create and update.
///
/// `name` and `email` are optional here so that a missing field can be
/// reported as a validation failure instead of a decode error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserFields {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub email: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub phone: Option<String>,
}

/// A validated user write, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// A user together with the farms that reference it as owner.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserWithFarms {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub user: UserRecord,
    pub farms: Vec<FarmRecord>,
}
