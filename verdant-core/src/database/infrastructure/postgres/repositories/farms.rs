use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::database::infrastructure::postgres::{map_delete_error, map_read_error, map_write_error};
use crate::database::ports::farms::FarmsRepository;
use crate::error::Result;
use verdant_model::{FarmFilter, FarmID, FarmRecord, NewFarm, UserID};

const FARM_COLUMNS: &str = "id, name, email, owner_id, description, phone, website, address, \
                            owner_name, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresFarmsRepository {
    pool: PgPool,
}

impl PostgresFarmsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn owner_param(filter: FarmFilter) -> Option<Uuid> {
    match filter {
        FarmFilter::All => None,
        FarmFilter::OwnedBy(owner) => Some(owner.to_uuid()),
    }
}

#[async_trait]
impl FarmsRepository for PostgresFarmsRepository {
    async fn list_farms(&self, filter: FarmFilter) -> Result<Vec<FarmRecord>> {
        let rows = sqlx::query_as::<_, FarmRow>(&format!(
            r#"
            SELECT {FARM_COLUMNS} FROM farms
            WHERE ($1::uuid IS NULL OR owner_id = $1)
            ORDER BY created_at DESC
            "#
        ))
        .bind(owner_param(filter))
        .fetch_all(self.pool())
        .await
        .map_err(|e| map_read_error(e, "Failed to list farms"))?;

        Ok(rows.into_iter().map(FarmRecord::from).collect())
    }

    async fn delete_farms(&self, filter: FarmFilter) -> Result<u64> {
        let result = sqlx::query("DELETE FROM farms WHERE ($1::uuid IS NULL OR owner_id = $1)")
            .bind(owner_param(filter))
            .execute(self.pool())
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete farms"))?;

        Ok(result.rows_affected())
    }

    async fn find_farm_by_email(
        &self,
        email: &str,
        exclude: Option<FarmID>,
    ) -> Result<Option<FarmRecord>> {
        let row = sqlx::query_as::<_, FarmRow>(&format!(
            r#"
            SELECT {FARM_COLUMNS} FROM farms
            WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2)
            LIMIT 1
            "#
        ))
        .bind(email)
        .bind(exclude.map(|id| id.to_uuid()))
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_read_error(e, "Failed to look up farm by email"))?;

        Ok(row.map(FarmRecord::from))
    }

    async fn insert_farm(&self, farm: &NewFarm) -> Result<FarmRecord> {
        let row = sqlx::query_as::<_, FarmRow>(&format!(
            r#"
            INSERT INTO farms
                (name, email, owner_id, description, phone, website, address, owner_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {FARM_COLUMNS}
            "#
        ))
        .bind(&farm.name)
        .bind(&farm.email)
        .bind(farm.owner_id.map(|id| id.to_uuid()))
        .bind(&farm.description)
        .bind(&farm.phone)
        .bind(&farm.website)
        .bind(&farm.address)
        .bind(&farm.owner_name)
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_write_error(e, "Failed to create farm"))?;

        debug!(farm_id = %row.id, "inserted farm row");
        Ok(row.into())
    }

    async fn update_farm(&self, id: FarmID, farm: &NewFarm) -> Result<Option<FarmRecord>> {
        let row = sqlx::query_as::<_, FarmRow>(&format!(
            r#"
            UPDATE farms
            SET name = $2, email = $3, owner_id = $4, description = $5, phone = $6,
                website = $7, address = $8, owner_name = $9, updated_at = NOW()
            WHERE id = $1
            RETURNING {FARM_COLUMNS}
            "#
        ))
        .bind(id.to_uuid())
        .bind(&farm.name)
        .bind(&farm.email)
        .bind(farm.owner_id.map(|id| id.to_uuid()))
        .bind(&farm.description)
        .bind(&farm.phone)
        .bind(&farm.website)
        .bind(&farm.address)
        .bind(&farm.owner_name)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_write_error(e, "Failed to update farm"))?;

        Ok(row.map(FarmRecord::from))
    }

    async fn delete_farm(&self, id: FarmID) -> Result<Option<FarmRecord>> {
        let row = sqlx::query_as::<_, FarmRow>(&format!(
            "DELETE FROM farms WHERE id = $1 RETURNING {FARM_COLUMNS}"
        ))
        .bind(id.to_uuid())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_delete_error(e, "Failed to delete farm"))?;

        Ok(row.map(FarmRecord::from))
    }
}

#[derive(sqlx::FromRow)]
struct FarmRow {
    id: Uuid,
    name: String,
    email: String,
    owner_id: Option<Uuid>,
    description: Option<String>,
    phone: Option<String>,
    website: Option<String>,
    address: Option<String>,
    owner_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FarmRow> for FarmRecord {
    fn from(row: FarmRow) -> Self {
        Self {
            id: FarmID(row.id),
            name: row.name,
            email: row.email,
            owner_id: row.owner_id.map(UserID),
            description: row.description,
            phone: row.phone,
            website: row.website,
            address: row.address,
            owner_name: row.owner_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
