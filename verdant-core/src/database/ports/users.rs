use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::Result;
use verdant_model::{NewUser, UserID, UserRecord};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// All users, newest first.
    async fn list_users(&self) -> Result<Vec<UserRecord>>;
    async fn get_user(&self, id: UserID) -> Result<Option<UserRecord>>;

    /// A user with this exact email, ignoring `exclude` when given.
    async fn find_user_by_email(
        &self,
        email: &str,
        exclude: Option<UserID>,
    ) -> Result<Option<UserRecord>>;

    async fn insert_user(&self, user: &NewUser) -> Result<UserRecord>;

    /// Returns `None` when no user has this id.
    async fn update_user(&self, id: UserID, user: &NewUser) -> Result<Option<UserRecord>>;

    /// Returns the removed row, or `None` when no user has this id.
    async fn delete_user(&self, id: UserID) -> Result<Option<UserRecord>>;
}
