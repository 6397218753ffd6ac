// ============================================================================
// FieldOps Infrastructure - PostgreSQL Order Repository
// File: crates/fieldops-infrastructure/src/database/postgres/order_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use fieldops_core::domain::order::OrderStatus;
use fieldops_core::domain::Order;
use fieldops_core::error::DomainError;
use fieldops_core::repositories::OrderRepository;
use fieldops_shared::types::Pagination;

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct OrderRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub customer_id: Uuid,
    pub visit_id: Option<Uuid>,
    pub status: String,
    pub total_cents: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: row.id,
            tenant_id: row.tenant_id,
            customer_id: row.customer_id,
            visit_id: row.visit_id,
            status: OrderStatus::from_str(&row.status).unwrap_or_default(),
            total_cents: row.total_cents,
            notes: row.notes,
            created_at: row.created_at,
            created_by: row.created_by,
            modified_at: row.modified_at,
            modified_by: row.modified_by,
            removed_at: row.removed_at,
            removed_by: row.removed_by,
        }
    }
}

const ORDER_COLUMNS: &str = r#"
    id, tenant_id, customer_id, visit_id, status, total_cents, notes,
    created_at, created_by, modified_at, modified_by,
    removed_at, removed_by
"#;

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn find_by_id(
        &self,
        tenant_id: &Uuid,
        order_id: &Uuid,
    ) -> Result<Option<Order>, DomainError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE tenant_id = $1 AND id = $2 AND removed_at IS NULL"
        ))
        .bind(tenant_id)
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding order by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list<'a>(
        &self,
        tenant_id: &Uuid,
        customer_id: Option<&'a Uuid>,
        pagination: Pagination,
    ) -> Result<Vec<Order>, DomainError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE tenant_id = $1 AND removed_at IS NULL \
               AND ($2::uuid IS NULL OR customer_id = $2) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        ))
        .bind(tenant_id)
        .bind(customer_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing orders: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, order: &Order) -> Result<Order, DomainError> {
        let row: OrderRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO orders (
                id, tenant_id, customer_id, visit_id, status, total_cents, notes,
                created_at, created_by, modified_at, modified_by,
                removed_at, removed_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order.id)
        .bind(order.tenant_id)
        .bind(order.customer_id)
        .bind(order.visit_id)
        .bind(order.status.as_str())
        .bind(order.total_cents)
        .bind(&order.notes)
        .bind(order.created_at)
        .bind(order.created_by)
        .bind(order.modified_at)
        .bind(order.modified_by)
        .bind(order.removed_at)
        .bind(order.removed_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating order: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        info!("Order created successfully: {}", row.id);
        Ok(row.into())
    }

    async fn update(&self, order: &Order) -> Result<Order, DomainError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            r#"
            UPDATE orders
            SET
                status = $3,
                total_cents = $4,
                notes = $5,
                visit_id = $6,
                modified_at = $7,
                modified_by = $8
            WHERE tenant_id = $1 AND id = $2 AND removed_at IS NULL
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order.tenant_id)
        .bind(order.id)
        .bind(order.status.as_str())
        .bind(order.total_cents)
        .bind(&order.notes)
        .bind(order.visit_id)
        .bind(order.modified_at)
        .bind(order.modified_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating order: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        row.map(|r| r.into()).ok_or(DomainError::OrderNotFound)
    }

    async fn soft_delete(
        &self,
        tenant_id: &Uuid,
        order_id: &Uuid,
        removed_by: &Uuid,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE orders SET removed_at = NOW(), removed_by = $3 \
             WHERE tenant_id = $1 AND id = $2 AND removed_at IS NULL",
        )
        .bind(tenant_id)
        .bind(order_id)
        .bind(removed_by)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error deleting order: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::OrderNotFound);
        }
        info!("Order {} removed by {}", order_id, removed_by);
        Ok(())
    }
}
