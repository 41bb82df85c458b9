use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::database::infrastructure::postgres::{map_delete_error, map_read_error, map_write_error};
use crate::database::ports::users::UsersRepository;
use crate::error::Result;
use verdant_model::{NewUser, UserID, UserRecord};

const USER_COLUMNS: &str = "id, name, email, phone, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresUsersRepository {
    pool: PgPool,
}

impl PostgresUsersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UsersRepository for PostgresUsersRepository {
    async fn list_users(&self) -> Result<Vec<UserRecord>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(|e| map_read_error(e, "Failed to list users"))?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn get_user(&self, id: UserID) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.to_uuid())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_read_error(e, "Failed to get user"))?;

        Ok(row.map(UserRecord::from))
    }

    async fn find_user_by_email(
        &self,
        email: &str,
        exclude: Option<UserID>,
    ) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2)
            LIMIT 1
            "#
        ))
        .bind(email)
        .bind(exclude.map(|id| id.to_uuid()))
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_read_error(e, "Failed to look up user by email"))?;

        Ok(row.map(UserRecord::from))
    }

    async fn insert_user(&self, user: &NewUser) -> Result<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (name, email, phone)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_write_error(e, "Failed to create user"))?;

        debug!(user_id = %row.id, "inserted user row");
        Ok(row.into())
    }

    async fn update_user(&self, id: UserID, user: &NewUser) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET name = $2, email = $3, phone = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id.to_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_write_error(e, "Failed to update user"))?;

        Ok(row.map(UserRecord::from))
    }

    async fn delete_user(&self, id: UserID) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id.to_uuid())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_delete_error(e, "Failed to delete user"))?;

        Ok(row.map(UserRecord::from))
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserID(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
