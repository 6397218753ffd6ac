//! Visit repository trait (port)

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use fieldops_shared::types::Pagination;

use crate::domain::visit::{GeoPoint, Visit, VisitStatus, VisitStatusEvent};
use crate::error::DomainError;

/// Optional filters for visit listings.
#[derive(Debug, Clone, Default)]
pub struct VisitFilter {
    pub status: Option<VisitStatus>,
    pub assigned_rep_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Partial update of non-status fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct VisitChanges {
    pub planned_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// One status change, persisted atomically together with its history row.
/// `from` is the status the caller observed; implementations only apply the
/// change if the row still carries it.
#[derive(Debug, Clone)]
pub struct VisitTransition {
    pub from: VisitStatus,
    pub to: VisitStatus,
    pub at: DateTime<Utc>,
    pub location: Option<GeoPoint>,
    pub note: Option<String>,
    pub changed_by: Uuid,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitRepository: Send + Sync {
    async fn find_by_id(
        &self,
        tenant_id: &Uuid,
        visit_id: &Uuid,
    ) -> Result<Option<Visit>, DomainError>;

    async fn list(
        &self,
        tenant_id: &Uuid,
        filter: &VisitFilter,
        pagination: Pagination,
    ) -> Result<Vec<Visit>, DomainError>;

    /// Inserts the visit and its creation history row in one transaction.
    async fn create(&self, visit: &Visit) -> Result<Visit, DomainError>;

    /// Applies a guarded transition. Fails with `InvalidStatusTransition`
    /// when the stored status no longer matches `transition.from`.
    async fn apply_transition(
        &self,
        tenant_id: &Uuid,
        visit_id: &Uuid,
        transition: VisitTransition,
    ) -> Result<Visit, DomainError>;

    /// Edits non-status fields. Only rows still in `planned` accept edits;
    /// anything else fails with `VisitNotEditable`.
    async fn update_details(
        &self,
        tenant_id: &Uuid,
        visit_id: &Uuid,
        changes: &VisitChanges,
        modified_by: &Uuid,
    ) -> Result<Visit, DomainError>;

    /// Status history, oldest first.
    async fn list_events(
        &self,
        tenant_id: &Uuid,
        visit_id: &Uuid,
    ) -> Result<Vec<VisitStatusEvent>, DomainError>;
}
