// ============================================================================
// FieldOps Infrastructure - PostgreSQL Tier Repository
// File: crates/fieldops-infrastructure/src/database/postgres/tier_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use fieldops_core::domain::Tier;
use fieldops_core::error::DomainError;
use fieldops_core::repositories::TierRepository;

pub struct PgTierRepository {
    pool: PgPool,
}

impl PgTierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct TierRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub discount_percent: i32,
    pub rank: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl From<TierRow> for Tier {
    fn from(row: TierRow) -> Self {
        Tier {
            id: row.id,
            tenant_id: row.tenant_id,
            name: row.name,
            discount_percent: row.discount_percent,
            rank: row.rank,
            is_active: row.is_active,
            created_at: row.created_at,
            created_by: row.created_by,
            modified_at: row.modified_at,
            modified_by: row.modified_by,
            removed_at: row.removed_at,
            removed_by: row.removed_by,
        }
    }
}

const TIER_COLUMNS: &str = r#"
    id, tenant_id, name, discount_percent, rank, is_active,
    created_at, created_by, modified_at, modified_by,
    removed_at, removed_by
"#;

#[async_trait]
impl TierRepository for PgTierRepository {
    async fn find_by_id(
        &self,
        tenant_id: &Uuid,
        tier_id: &Uuid,
    ) -> Result<Option<Tier>, DomainError> {
        let row: Option<TierRow> = sqlx::query_as(&format!(
            "SELECT {TIER_COLUMNS} FROM tiers \
             WHERE tenant_id = $1 AND id = $2 AND removed_at IS NULL"
        ))
        .bind(tenant_id)
        .bind(tier_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding tier by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_name(
        &self,
        tenant_id: &Uuid,
        name: &str,
    ) -> Result<Option<Tier>, DomainError> {
        let row: Option<TierRow> = sqlx::query_as(&format!(
            "SELECT {TIER_COLUMNS} FROM tiers \
             WHERE tenant_id = $1 AND LOWER(name) = LOWER($2) AND removed_at IS NULL"
        ))
        .bind(tenant_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding tier by name: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list(&self, tenant_id: &Uuid) -> Result<Vec<Tier>, DomainError> {
        let rows: Vec<TierRow> = sqlx::query_as(&format!(
            "SELECT {TIER_COLUMNS} FROM tiers \
             WHERE tenant_id = $1 AND removed_at IS NULL \
             ORDER BY rank ASC, name ASC"
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing tiers: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, tier: &Tier) -> Result<Tier, DomainError> {
        let row: TierRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO tiers (
                id, tenant_id, name, discount_percent, rank, is_active,
                created_at, created_by, modified_at, modified_by,
                removed_at, removed_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {TIER_COLUMNS}
            "#
        ))
        .bind(tier.id)
        .bind(tier.tenant_id)
        .bind(&tier.name)
        .bind(tier.discount_percent)
        .bind(tier.rank)
        .bind(tier.is_active)
        .bind(tier.created_at)
        .bind(tier.created_by)
        .bind(tier.modified_at)
        .bind(tier.modified_by)
        .bind(tier.removed_at)
        .bind(tier.removed_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            let msg = e.to_string();
            if msg.contains("uq_tiers_name") {
                return DomainError::TierNameAlreadyExists(tier.name.clone());
            }
            error!("Database error creating tier: {}", e);
            DomainError::DatabaseError(msg)
        })?;

        info!("Tier created successfully: {}", row.id);
        Ok(row.into())
    }

    async fn update(&self, tier: &Tier) -> Result<Tier, DomainError> {
        let row: Option<TierRow> = sqlx::query_as(&format!(
            r#"
            UPDATE tiers
            SET
                name = $3,
                discount_percent = $4,
                rank = $5,
                is_active = $6,
                modified_at = $7,
                modified_by = $8
            WHERE tenant_id = $1 AND id = $2 AND removed_at IS NULL
            RETURNING {TIER_COLUMNS}
            "#
        ))
        .bind(tier.tenant_id)
        .bind(tier.id)
        .bind(&tier.name)
        .bind(tier.discount_percent)
        .bind(tier.rank)
        .bind(tier.is_active)
        .bind(tier.modified_at)
        .bind(tier.modified_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            let msg = e.to_string();
            if msg.contains("uq_tiers_name") {
                return DomainError::TierNameAlreadyExists(tier.name.clone());
            }
            error!("Database error updating tier: {}", e);
            DomainError::DatabaseError(msg)
        })?;

        row.map(|r| r.into()).ok_or(DomainError::TierNotFound)
    }

    async fn soft_delete(
        &self,
        tenant_id: &Uuid,
        tier_id: &Uuid,
        removed_by: &Uuid,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE tiers SET removed_at = NOW(), removed_by = $3 \
             WHERE tenant_id = $1 AND id = $2 AND removed_at IS NULL",
        )
        .bind(tenant_id)
        .bind(tier_id)
        .bind(removed_by)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error deleting tier: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TierNotFound);
        }
        info!("Tier {} removed by {}", tier_id, removed_by);
        Ok(())
    }
}
