// ============================================================================
// FieldOps Infrastructure - PostgreSQL Visit Repository
// File: crates/fieldops-infrastructure/src/database/postgres/visit_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use fieldops_core::domain::visit::{ensure_transition, GeoPoint, VisitStatus};
use fieldops_core::domain::{Visit, VisitStatusEvent};
use fieldops_core::error::DomainError;
use fieldops_core::repositories::visit_repository::{
    VisitChanges, VisitFilter, VisitRepository, VisitTransition,
};
use fieldops_shared::types::Pagination;

pub struct PgVisitRepository {
    pool: PgPool,
}

impl PgVisitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct VisitRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub customer_id: Uuid,
    pub assigned_rep_id: Uuid,
    pub status: String,
    pub planned_date: NaiveDate,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub start_latitude: Option<f64>,
    pub start_longitude: Option<f64>,
    pub end_latitude: Option<f64>,
    pub end_longitude: Option<f64>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

fn geo_point(lat: Option<f64>, lon: Option<f64>) -> Option<GeoPoint> {
    match (lat, lon) {
        (Some(latitude), Some(longitude)) => Some(GeoPoint { latitude, longitude }),
        _ => None,
    }
}

impl From<VisitRow> for Visit {
    fn from(row: VisitRow) -> Self {
        Visit {
            id: row.id,
            tenant_id: row.tenant_id,
            customer_id: row.customer_id,
            assigned_rep_id: row.assigned_rep_id,
            status: VisitStatus::from_str(&row.status).unwrap_or_default(),
            planned_date: row.planned_date,
            started_at: row.started_at,
            completed_at: row.completed_at,
            start_location: geo_point(row.start_latitude, row.start_longitude),
            end_location: geo_point(row.end_latitude, row.end_longitude),
            notes: row.notes,
            tags: row.tags,
            cancel_reason: row.cancel_reason,
            created_at: row.created_at,
            created_by: row.created_by,
            modified_at: row.modified_at,
            modified_by: row.modified_by,
            removed_at: row.removed_at,
            removed_by: row.removed_by,
        }
    }
}

#[derive(Debug, FromRow)]
struct VisitStatusEventRow {
    pub id: Uuid,
    pub visit_id: Uuid,
    pub from_status: Option<String>,
    pub to_status: String,
    pub note: Option<String>,
    pub changed_by: Uuid,
    pub changed_at: DateTime<Utc>,
}

impl From<VisitStatusEventRow> for VisitStatusEvent {
    fn from(row: VisitStatusEventRow) -> Self {
        VisitStatusEvent {
            id: row.id,
            visit_id: row.visit_id,
            from_status: row.from_status.as_deref().and_then(VisitStatus::from_str),
            to_status: VisitStatus::from_str(&row.to_status).unwrap_or_default(),
            note: row.note,
            changed_by: row.changed_by,
            changed_at: row.changed_at,
        }
    }
}

#[async_trait]
impl VisitRepository for PgVisitRepository {
    async fn find_by_id(
        &self,
        tenant_id: &Uuid,
        visit_id: &Uuid,
    ) -> Result<Option<Visit>, DomainError> {
        let row: Option<VisitRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, customer_id, assigned_rep_id,
                status, planned_date, started_at, completed_at,
                start_latitude, start_longitude, end_latitude, end_longitude,
                notes, tags, cancel_reason,
                created_at, created_by, modified_at, modified_by,
                removed_at, removed_by
            FROM visits
            WHERE tenant_id = $1 AND id = $2 AND removed_at IS NULL
            "#,
        )
        .bind(tenant_id)
        .bind(visit_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding visit by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list(
        &self,
        tenant_id: &Uuid,
        filter: &VisitFilter,
        pagination: Pagination,
    ) -> Result<Vec<Visit>, DomainError> {
        let rows: Vec<VisitRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, customer_id, assigned_rep_id,
                status, planned_date, started_at, completed_at,
                start_latitude, start_longitude, end_latitude, end_longitude,
                notes, tags, cancel_reason,
                created_at, created_by, modified_at, modified_by,
                removed_at, removed_by
            FROM visits
            WHERE tenant_id = $1 AND removed_at IS NULL
              AND ($2::text IS NULL OR status = $2)
              AND ($3::uuid IS NULL OR assigned_rep_id = $3)
              AND ($4::uuid IS NULL OR customer_id = $4)
              AND ($5::date IS NULL OR planned_date >= $5)
              AND ($6::date IS NULL OR planned_date <= $6)
            ORDER BY planned_date DESC, created_at DESC
            LIMIT $7 OFFSET $8
            "#,
        )
        .bind(tenant_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.assigned_rep_id)
        .bind(filter.customer_id)
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing visits: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, visit: &Visit) -> Result<Visit, DomainError> {
        info!("Creating visit for customer: {}", visit.customer_id);

        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to open transaction: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        let row: VisitRow = sqlx::query_as(
            r#"
            INSERT INTO visits (
                id, tenant_id, customer_id, assigned_rep_id,
                status, planned_date, started_at, completed_at,
                start_latitude, start_longitude, end_latitude, end_longitude,
                notes, tags, cancel_reason,
                created_at, created_by, modified_at, modified_by,
                removed_at, removed_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
            RETURNING
                id, tenant_id, customer_id, assigned_rep_id,
                status, planned_date, started_at, completed_at,
                start_latitude, start_longitude, end_latitude, end_longitude,
                notes, tags, cancel_reason,
                created_at, created_by, modified_at, modified_by,
                removed_at, removed_by
            "#,
        )
        .bind(visit.id)
        .bind(visit.tenant_id)
        .bind(visit.customer_id)
        .bind(visit.assigned_rep_id)
        .bind(visit.status.as_str())
        .bind(visit.planned_date)
        .bind(visit.started_at)
        .bind(visit.completed_at)
        .bind(visit.start_location.map(|l| l.latitude))
        .bind(visit.start_location.map(|l| l.longitude))
        .bind(visit.end_location.map(|l| l.latitude))
        .bind(visit.end_location.map(|l| l.longitude))
        .bind(&visit.notes)
        .bind(&visit.tags)
        .bind(&visit.cancel_reason)
        .bind(visit.created_at)
        .bind(visit.created_by)
        .bind(visit.modified_at)
        .bind(visit.modified_by)
        .bind(visit.removed_at)
        .bind(visit.removed_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating visit: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        // Creation lands in the history with no prior status
        sqlx::query(
            r#"
            INSERT INTO visit_status_events (id, visit_id, from_status, to_status, note, changed_by, changed_at)
            VALUES ($1, $2, NULL, $3, NULL, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(visit.id)
        .bind(visit.status.as_str())
        .bind(visit.created_by)
        .bind(visit.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error writing visit creation event: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        tx.commit().await.map_err(|e| {
            error!("Failed to commit visit creation: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        info!("Visit created successfully: {}", row.id);
        Ok(row.into())
    }

    async fn apply_transition(
        &self,
        tenant_id: &Uuid,
        visit_id: &Uuid,
        transition: VisitTransition,
    ) -> Result<Visit, DomainError> {
        // The table is the contract even for direct repository callers.
        ensure_transition(transition.from, transition.to)?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to open transaction: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        // The status filter makes the update conditional: a concurrent
        // transition that already moved the row leaves nothing to match.
        let updated: Option<VisitRow> = match transition.to {
            VisitStatus::InProgress => {
                sqlx::query_as(
                    r#"
                    UPDATE visits
                    SET
                        status = $4,
                        started_at = $5,
                        start_latitude = $6,
                        start_longitude = $7,
                        modified_at = $5,
                        modified_by = $8
                    WHERE tenant_id = $1 AND id = $2 AND status = $3 AND removed_at IS NULL
                    RETURNING
                        id, tenant_id, customer_id, assigned_rep_id,
                        status, planned_date, started_at, completed_at,
                        start_latitude, start_longitude, end_latitude, end_longitude,
                        notes, tags, cancel_reason,
                        created_at, created_by, modified_at, modified_by,
                        removed_at, removed_by
                    "#,
                )
                .bind(tenant_id)
                .bind(visit_id)
                .bind(transition.from.as_str())
                .bind(transition.to.as_str())
                .bind(transition.at)
                .bind(transition.location.map(|l| l.latitude))
                .bind(transition.location.map(|l| l.longitude))
                .bind(transition.changed_by)
                .fetch_optional(&mut *tx)
                .await
            }
            VisitStatus::Completed => {
                sqlx::query_as(
                    r#"
                    UPDATE visits
                    SET
                        status = $4,
                        completed_at = $5,
                        end_latitude = $6,
                        end_longitude = $7,
                        modified_at = $5,
                        modified_by = $8
                    WHERE tenant_id = $1 AND id = $2 AND status = $3 AND removed_at IS NULL
                    RETURNING
                        id, tenant_id, customer_id, assigned_rep_id,
                        status, planned_date, started_at, completed_at,
                        start_latitude, start_longitude, end_latitude, end_longitude,
                        notes, tags, cancel_reason,
                        created_at, created_by, modified_at, modified_by,
                        removed_at, removed_by
                    "#,
                )
                .bind(tenant_id)
                .bind(visit_id)
                .bind(transition.from.as_str())
                .bind(transition.to.as_str())
                .bind(transition.at)
                .bind(transition.location.map(|l| l.latitude))
                .bind(transition.location.map(|l| l.longitude))
                .bind(transition.changed_by)
                .fetch_optional(&mut *tx)
                .await
            }
            VisitStatus::Cancelled => {
                sqlx::query_as(
                    r#"
                    UPDATE visits
                    SET
                        status = $4,
                        cancel_reason = $5,
                        modified_at = $6,
                        modified_by = $7
                    WHERE tenant_id = $1 AND id = $2 AND status = $3 AND removed_at IS NULL
                    RETURNING
                        id, tenant_id, customer_id, assigned_rep_id,
                        status, planned_date, started_at, completed_at,
                        start_latitude, start_longitude, end_latitude, end_longitude,
                        notes, tags, cancel_reason,
                        created_at, created_by, modified_at, modified_by,
                        removed_at, removed_by
                    "#,
                )
                .bind(tenant_id)
                .bind(visit_id)
                .bind(transition.from.as_str())
                .bind(transition.to.as_str())
                .bind(&transition.note)
                .bind(transition.at)
                .bind(transition.changed_by)
                .fetch_optional(&mut *tx)
                .await
            }
            _ => {
                sqlx::query_as(
                    r#"
                    UPDATE visits
                    SET
                        status = $4,
                        modified_at = $5,
                        modified_by = $6
                    WHERE tenant_id = $1 AND id = $2 AND status = $3 AND removed_at IS NULL
                    RETURNING
                        id, tenant_id, customer_id, assigned_rep_id,
                        status, planned_date, started_at, completed_at,
                        start_latitude, start_longitude, end_latitude, end_longitude,
                        notes, tags, cancel_reason,
                        created_at, created_by, modified_at, modified_by,
                        removed_at, removed_by
                    "#,
                )
                .bind(tenant_id)
                .bind(visit_id)
                .bind(transition.from.as_str())
                .bind(transition.to.as_str())
                .bind(transition.at)
                .bind(transition.changed_by)
                .fetch_optional(&mut *tx)
                .await
            }
        }
        .map_err(|e: sqlx::Error| {
            error!("Database error applying visit transition: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        let Some(row) = updated else {
            // Report the status that won instead of a bare conflict.
            drop(tx);
            return match self.find_by_id(tenant_id, visit_id).await? {
                Some(current) => Err(DomainError::InvalidStatusTransition {
                    from: current.status,
                    to: transition.to,
                }),
                None => Err(DomainError::VisitNotFound),
            };
        };

        sqlx::query(
            r#"
            INSERT INTO visit_status_events (id, visit_id, from_status, to_status, note, changed_by, changed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(visit_id)
        .bind(transition.from.as_str())
        .bind(transition.to.as_str())
        .bind(&transition.note)
        .bind(transition.changed_by)
        .bind(transition.at)
        .execute(&mut *tx)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error writing visit status event: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        tx.commit().await.map_err(|e| {
            error!("Failed to commit visit transition: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        info!(
            "Visit {} transitioned {} -> {}",
            visit_id, transition.from, transition.to
        );
        Ok(row.into())
    }

    async fn update_details(
        &self,
        tenant_id: &Uuid,
        visit_id: &Uuid,
        changes: &VisitChanges,
        modified_by: &Uuid,
    ) -> Result<Visit, DomainError> {
        // Single conditional statement: edits only land while still planned.
        let updated: Option<VisitRow> = sqlx::query_as(
            r#"
            UPDATE visits
            SET
                planned_date = COALESCE($4, planned_date),
                notes = COALESCE($5, notes),
                tags = COALESCE($6, tags),
                modified_at = NOW(),
                modified_by = $3
            WHERE tenant_id = $1 AND id = $2 AND status = 'planned' AND removed_at IS NULL
            RETURNING
                id, tenant_id, customer_id, assigned_rep_id,
                status, planned_date, started_at, completed_at,
                start_latitude, start_longitude, end_latitude, end_longitude,
                notes, tags, cancel_reason,
                created_at, created_by, modified_at, modified_by,
                removed_at, removed_by
            "#,
        )
        .bind(tenant_id)
        .bind(visit_id)
        .bind(modified_by)
        .bind(changes.planned_date)
        .bind(&changes.notes)
        .bind(&changes.tags)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating visit details: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        match updated {
            Some(row) => Ok(row.into()),
            None => match self.find_by_id(tenant_id, visit_id).await? {
                Some(current) => Err(DomainError::VisitNotEditable(current.status)),
                None => Err(DomainError::VisitNotFound),
            },
        }
    }

    async fn list_events(
        &self,
        tenant_id: &Uuid,
        visit_id: &Uuid,
    ) -> Result<Vec<VisitStatusEvent>, DomainError> {
        let rows: Vec<VisitStatusEventRow> = sqlx::query_as(
            r#"
            SELECT e.id, e.visit_id, e.from_status, e.to_status, e.note, e.changed_by, e.changed_at
            FROM visit_status_events e
            JOIN visits v ON v.id = e.visit_id
            WHERE v.tenant_id = $1 AND e.visit_id = $2
            ORDER BY e.changed_at ASC, e.id ASC
            "#,
        )
        .bind(tenant_id)
        .bind(visit_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing visit events: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}
