// ============================================================================
// FieldOps Infrastructure - PostgreSQL Brand Repository
// File: crates/fieldops-infrastructure/src/database/postgres/brand_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use fieldops_core::domain::Brand;
use fieldops_core::error::DomainError;
use fieldops_core::repositories::BrandRepository;
use fieldops_shared::types::Pagination;

pub struct PgBrandRepository {
    pool: PgPool,
}

impl PgBrandRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct BrandRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl From<BrandRow> for Brand {
    fn from(row: BrandRow) -> Self {
        Brand {
            id: row.id,
            tenant_id: row.tenant_id,
            name: row.name,
            description: row.description,
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

const BRAND_COLUMNS: &str = r#"
    id, tenant_id, name, description, is_active,
    created_at, created_by, modified_at, modified_by,
    removed_at, removed_by
"#;

#[async_trait]
impl BrandRepository for PgBrandRepository {
    async fn find_by_id(
        &self,
        tenant_id: &Uuid,
        brand_id: &Uuid,
    ) -> Result<Option<Brand>, DomainError> {
        let row: Option<BrandRow> = sqlx::query_as(&format!(
            "SELECT {BRAND_COLUMNS} FROM brands \
             WHERE tenant_id = $1 AND id = $2 AND removed_at IS NULL"
        ))
        .bind(tenant_id)
        .bind(brand_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding brand by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_name(
        &self,
        tenant_id: &Uuid,
        name: &str,
    ) -> Result<Option<Brand>, DomainError> {
        let row: Option<BrandRow> = sqlx::query_as(&format!(
            "SELECT {BRAND_COLUMNS} FROM brands \
             WHERE tenant_id = $1 AND LOWER(name) = LOWER($2) AND removed_at IS NULL"
        ))
        .bind(tenant_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding brand by name: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list(
        &self,
        tenant_id: &Uuid,
        pagination: Pagination,
    ) -> Result<Vec<Brand>, DomainError> {
        let rows: Vec<BrandRow> = sqlx::query_as(&format!(
            "SELECT {BRAND_COLUMNS} FROM brands \
             WHERE tenant_id = $1 AND removed_at IS NULL \
             ORDER BY name ASC LIMIT $2 OFFSET $3"
        ))
        .bind(tenant_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing brands: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, brand: &Brand) -> Result<Brand, DomainError> {
        let row: BrandRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO brands (
                id, tenant_id, name, description, is_active,
                created_at, created_by, modified_at, modified_by,
                removed_at, removed_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {BRAND_COLUMNS}
            "#
        ))
        .bind(brand.id)
        .bind(brand.tenant_id)
        .bind(&brand.name)
        .bind(&brand.description)
        .bind(brand.is_active)
        .bind(brand.created_at)
        .bind(brand.created_by)
        .bind(brand.modified_at)
        .bind(brand.modified_by)
        .bind(brand.removed_at)
        .bind(brand.removed_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            let msg = e.to_string();
            if msg.contains("uq_brands_name") {
                return DomainError::BrandNameAlreadyExists(brand.name.clone());
            }
            error!("Database error creating brand: {}", e);
            DomainError::DatabaseError(msg)
        })?;

        info!("Brand created successfully: {}", row.id);
        Ok(row.into())
    }

    async fn update(&self, brand: &Brand) -> Result<Brand, DomainError> {
        let row: Option<BrandRow> = sqlx::query_as(&format!(
            r#"
            UPDATE brands
            SET
                name = $3,
                description = $4,
                is_active = $5,
                modified_at = $6,
                modified_by = $7
            WHERE tenant_id = $1 AND id = $2 AND removed_at IS NULL
            RETURNING {BRAND_COLUMNS}
            "#
        ))
        .bind(brand.tenant_id)
        .bind(brand.id)
        .bind(&brand.name)
        .bind(&brand.description)
        .bind(brand.is_active)
        .bind(brand.modified_at)
        .bind(brand.modified_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            let msg = e.to_string();
            if msg.contains("uq_brands_name") {
                return DomainError::BrandNameAlreadyExists(brand.name.clone());
            }
            error!("Database error updating brand: {}", e);
            DomainError::DatabaseError(msg)
        })?;

        row.map(|r| r.into()).ok_or(DomainError::BrandNotFound)
    }

    async fn soft_delete(
        &self,
        tenant_id: &Uuid,
        brand_id: &Uuid,
        removed_by: &Uuid,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE brands SET removed_at = NOW(), removed_by = $3 \
             WHERE tenant_id = $1 AND id = $2 AND removed_at IS NULL",
        )
        .bind(tenant_id)
        .bind(brand_id)
        .bind(removed_by)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error deleting brand: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::BrandNotFound);
        }
        info!("Brand {} removed by {}", brand_id, removed_by);
        Ok(())
    }
}
