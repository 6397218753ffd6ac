// ============================================================================
// FieldOps Infrastructure - PostgreSQL Export Repository
// File: crates/fieldops-infrastructure/src/database/postgres/export_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use fieldops_core::domain::{ExportFormat, ExportRequest, ExportResource, ExportStatus};
use fieldops_core::error::DomainError;
use fieldops_core::repositories::ExportRepository;
use fieldops_shared::types::Pagination;

pub struct PgExportRepository {
    pool: PgPool,
}

impl PgExportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct ExportRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub requested_by: Uuid,
    pub resource: String,
    pub format: String,
    pub status: String,
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<ExportRow> for ExportRequest {
    fn from(row: ExportRow) -> Self {
        ExportRequest {
            id: row.id,
            tenant_id: row.tenant_id,
            requested_by: row.requested_by,
            resource: ExportResource::from_str(&row.resource)
                .unwrap_or(ExportResource::Customers),
            format: ExportFormat::from_str(&row.format).unwrap_or(ExportFormat::Csv),
            status: ExportStatus::from_str(&row.status).unwrap_or_default(),
            file_path: row.file_path,
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }
}

const EXPORT_COLUMNS: &str = r#"
    id, tenant_id, requested_by, resource, format, status, file_path,
    created_at, modified_at
"#;

#[async_trait]
impl ExportRepository for PgExportRepository {
    async fn find_by_id(
        &self,
        tenant_id: &Uuid,
        export_id: &Uuid,
    ) -> Result<Option<ExportRequest>, DomainError> {
        let row: Option<ExportRow> = sqlx::query_as(&format!(
            "SELECT {EXPORT_COLUMNS} FROM exports WHERE tenant_id = $1 AND id = $2"
        ))
        .bind(tenant_id)
        .bind(export_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding export by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list(
        &self,
        tenant_id: &Uuid,
        pagination: Pagination,
    ) -> Result<Vec<ExportRequest>, DomainError> {
        let rows: Vec<ExportRow> = sqlx::query_as(&format!(
            "SELECT {EXPORT_COLUMNS} FROM exports WHERE tenant_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(tenant_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing exports: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, export: &ExportRequest) -> Result<ExportRequest, DomainError> {
        let row: ExportRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO exports (
                id, tenant_id, requested_by, resource, format, status, file_path,
                created_at, modified_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {EXPORT_COLUMNS}
            "#
        ))
        .bind(export.id)
        .bind(export.tenant_id)
        .bind(export.requested_by)
        .bind(export.resource.as_str())
        .bind(export.format.as_str())
        .bind(export.status.as_str())
        .bind(&export.file_path)
        .bind(export.created_at)
        .bind(export.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating export request: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        info!(
            "Export request created: {} ({} as {})",
            row.id,
            export.resource.as_str(),
            export.format.as_str()
        );
        Ok(row.into())
    }

    async fn update(&self, export: &ExportRequest) -> Result<ExportRequest, DomainError> {
        let row: Option<ExportRow> = sqlx::query_as(&format!(
            r#"
            UPDATE exports
            SET status = $3, file_path = $4, modified_at = $5
            WHERE tenant_id = $1 AND id = $2
            RETURNING {EXPORT_COLUMNS}
            "#
        ))
        .bind(export.tenant_id)
        .bind(export.id)
        .bind(export.status.as_str())
        .bind(&export.file_path)
        .bind(export.modified_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating export request: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        row.map(|r| r.into()).ok_or(DomainError::ExportNotFound)
    }
}
