// ============================================================================
// FieldOps Infrastructure - PostgreSQL Customer Repository
// File: crates/fieldops-infrastructure/src/database/postgres/customer_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use fieldops_core::domain::Customer;
use fieldops_core::error::DomainError;
use fieldops_core::repositories::CustomerRepository;
use fieldops_shared::types::Pagination;

pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct CustomerRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub tier_id: Option<Uuid>,
    pub assigned_rep_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            tenant_id: row.tenant_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            city: row.city,
            tier_id: row.tier_id,
            assigned_rep_id: row.assigned_rep_id,
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

const CUSTOMER_COLUMNS: &str = r#"
    id, tenant_id, name, email, phone, address, city,
    tier_id, assigned_rep_id, is_active,
    created_at, created_by, modified_at, modified_by,
    removed_at, removed_by
"#;

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn find_by_id(
        &self,
        tenant_id: &Uuid,
        customer_id: &Uuid,
    ) -> Result<Option<Customer>, DomainError> {
        let row: Option<CustomerRow> = sqlx::query_as(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers \
             WHERE tenant_id = $1 AND id = $2 AND removed_at IS NULL"
        ))
        .bind(tenant_id)
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding customer by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list(
        &self,
        tenant_id: &Uuid,
        pagination: Pagination,
    ) -> Result<Vec<Customer>, DomainError> {
        let rows: Vec<CustomerRow> = sqlx::query_as(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers \
             WHERE tenant_id = $1 AND removed_at IS NULL \
             ORDER BY name ASC LIMIT $2 OFFSET $3"
        ))
        .bind(tenant_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing customers: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, customer: &Customer) -> Result<Customer, DomainError> {
        info!("Creating customer in tenant: {}", customer.tenant_id);

        let row: CustomerRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO customers (
                id, tenant_id, name, email, phone, address, city,
                tier_id, assigned_rep_id, is_active,
                created_at, created_by, modified_at, modified_by,
                removed_at, removed_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(customer.id)
        .bind(customer.tenant_id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.city)
        .bind(customer.tier_id)
        .bind(customer.assigned_rep_id)
        .bind(customer.is_active)
        .bind(customer.created_at)
        .bind(customer.created_by)
        .bind(customer.modified_at)
        .bind(customer.modified_by)
        .bind(customer.removed_at)
        .bind(customer.removed_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating customer: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        info!("Customer created successfully: {}", row.id);
        Ok(row.into())
    }

    async fn update(&self, customer: &Customer) -> Result<Customer, DomainError> {
        let row: Option<CustomerRow> = sqlx::query_as(&format!(
            r#"
            UPDATE customers
            SET
                name = $3,
                email = $4,
                phone = $5,
                address = $6,
                city = $7,
                tier_id = $8,
                assigned_rep_id = $9,
                is_active = $10,
                modified_at = $11,
                modified_by = $12
            WHERE tenant_id = $1 AND id = $2 AND removed_at IS NULL
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(customer.tenant_id)
        .bind(customer.id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.city)
        .bind(customer.tier_id)
        .bind(customer.assigned_rep_id)
        .bind(customer.is_active)
        .bind(customer.modified_at)
        .bind(customer.modified_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating customer: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        row.map(|r| r.into()).ok_or(DomainError::CustomerNotFound)
    }

    async fn soft_delete(
        &self,
        tenant_id: &Uuid,
        customer_id: &Uuid,
        removed_by: &Uuid,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE customers SET removed_at = NOW(), removed_by = $3 \
             WHERE tenant_id = $1 AND id = $2 AND removed_at IS NULL",
        )
        .bind(tenant_id)
        .bind(customer_id)
        .bind(removed_by)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error deleting customer: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CustomerNotFound);
        }
        info!("Customer {} removed by {}", customer_id, removed_by);
        Ok(())
    }
}
