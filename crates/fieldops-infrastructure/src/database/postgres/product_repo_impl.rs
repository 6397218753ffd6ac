// ============================================================================
// FieldOps Infrastructure - PostgreSQL Product Repository
// File: crates/fieldops-infrastructure/src/database/postgres/product_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use fieldops_core::domain::Product;
use fieldops_core::error::DomainError;
use fieldops_core::repositories::ProductRepository;
use fieldops_shared::types::Pagination;

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct ProductRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub brand_id: Option<Uuid>,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub unit_price_cents: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            tenant_id: row.tenant_id,
            brand_id: row.brand_id,
            sku: row.sku,
            name: row.name,
            description: row.description,
            unit_price_cents: row.unit_price_cents,
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

const PRODUCT_COLUMNS: &str = r#"
    id, tenant_id, brand_id, sku, name, description,
    unit_price_cents, is_active,
    created_at, created_by, modified_at, modified_by,
    removed_at, removed_by
"#;

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by_id(
        &self,
        tenant_id: &Uuid,
        product_id: &Uuid,
    ) -> Result<Option<Product>, DomainError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE tenant_id = $1 AND id = $2 AND removed_at IS NULL"
        ))
        .bind(tenant_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding product by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_sku(
        &self,
        tenant_id: &Uuid,
        sku: &str,
    ) -> Result<Option<Product>, DomainError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE tenant_id = $1 AND sku = $2 AND removed_at IS NULL"
        ))
        .bind(tenant_id)
        .bind(sku)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding product by sku: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list<'a>(
        &self,
        tenant_id: &Uuid,
        brand_id: Option<&'a Uuid>,
        pagination: Pagination,
    ) -> Result<Vec<Product>, DomainError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE tenant_id = $1 AND removed_at IS NULL \
               AND ($2::uuid IS NULL OR brand_id = $2) \
             ORDER BY name ASC LIMIT $3 OFFSET $4"
        ))
        .bind(tenant_id)
        .bind(brand_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing products: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, product: &Product) -> Result<Product, DomainError> {
        let row: ProductRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO products (
                id, tenant_id, brand_id, sku, name, description,
                unit_price_cents, is_active,
                created_at, created_by, modified_at, modified_by,
                removed_at, removed_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product.id)
        .bind(product.tenant_id)
        .bind(product.brand_id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.unit_price_cents)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.created_by)
        .bind(product.modified_at)
        .bind(product.modified_by)
        .bind(product.removed_at)
        .bind(product.removed_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            let msg = e.to_string();
            if msg.contains("uq_products_sku") {
                return DomainError::SkuAlreadyExists(product.sku.clone());
            }
            error!("Database error creating product: {}", e);
            DomainError::DatabaseError(msg)
        })?;

        info!("Product created successfully: {}", row.id);
        Ok(row.into())
    }

    async fn update(&self, product: &Product) -> Result<Product, DomainError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            r#"
            UPDATE products
            SET
                brand_id = $3,
                name = $4,
                description = $5,
                unit_price_cents = $6,
                is_active = $7,
                modified_at = $8,
                modified_by = $9
            WHERE tenant_id = $1 AND id = $2 AND removed_at IS NULL
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product.tenant_id)
        .bind(product.id)
        .bind(product.brand_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.unit_price_cents)
        .bind(product.is_active)
        .bind(product.modified_at)
        .bind(product.modified_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating product: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        row.map(|r| r.into()).ok_or(DomainError::ProductNotFound)
    }

    async fn soft_delete(
        &self,
        tenant_id: &Uuid,
        product_id: &Uuid,
        removed_by: &Uuid,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE products SET removed_at = NOW(), removed_by = $3 \
             WHERE tenant_id = $1 AND id = $2 AND removed_at IS NULL",
        )
        .bind(tenant_id)
        .bind(product_id)
        .bind(removed_by)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error deleting product: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ProductNotFound);
        }
        info!("Product {} removed by {}", product_id, removed_by);
        Ok(())
    }
}
