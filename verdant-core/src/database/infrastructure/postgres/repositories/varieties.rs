use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::database::infrastructure::postgres::{map_delete_error, map_read_error};
use crate::database::ports::varieties::VarietiesRepository;
use crate::error::Result;
use verdant_model::{VarietyID, VarietyOrder, VarietyRecord};

#[derive(Debug, Clone)]
pub struct PostgresVarietiesRepository {
    pool: PgPool,
}

impl PostgresVarietiesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl VarietiesRepository for PostgresVarietiesRepository {
    async fn list_varieties(&self, order: VarietyOrder) -> Result<Vec<VarietyRecord>> {
        let sql = match order {
            VarietyOrder::NameThenId => {
                r#"
                SELECT id, name, category_name, subcategory_name, description, created_at, updated_at
                FROM varieties_search
                ORDER BY name, id
                "#
            }
            VarietyOrder::Name => {
                r#"
                SELECT id, name, category_name, subcategory_name, description, created_at, updated_at
                FROM varieties_search
                ORDER BY name
                "#
            }
        };

        let rows = sqlx::query_as::<_, VarietyRow>(sql)
            .fetch_all(self.pool())
            .await
            .map_err(|e| map_read_error(e, "Failed to list varieties"))?;

        Ok(rows.into_iter().map(VarietyRecord::from).collect())
    }

    async fn get_varieties_by_ids(&self, ids: &[VarietyID]) -> Result<Vec<VarietyRecord>> {
        let ids: Vec<Uuid> = ids.iter().map(VarietyID::to_uuid).collect();
        let rows = sqlx::query_as::<_, VarietyRow>(
            r#"
            SELECT id, name, category_name, subcategory_name, description, created_at, updated_at
            FROM varieties_search
            WHERE id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(self.pool())
        .await
        .map_err(|e| map_read_error(e, "Failed to load varieties"))?;

        Ok(rows.into_iter().map(VarietyRecord::from).collect())
    }

    async fn delete_varieties(&self, ids: &[VarietyID]) -> Result<u64> {
        let ids: Vec<Uuid> = ids.iter().map(VarietyID::to_uuid).collect();
        let result = sqlx::query("DELETE FROM varieties WHERE id = ANY($1)")
            .bind(&ids)
            .execute(self.pool())
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete varieties"))?;

        debug!(
            requested = ids.len(),
            affected = result.rows_affected(),
            "bulk variety delete"
        );
        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct VarietyRow {
    id: Uuid,
    name: String,
    category_name: String,
    subcategory_name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VarietyRow> for VarietyRecord {
    fn from(row: VarietyRow) -> Self {
        Self {
            id: VarietyID(row.id),
            name: row.name,
            category_name: row.category_name,
            subcategory_name: row.subcategory_name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
