// ============================================================================
// FieldOps Core - Visit Service
// File: crates/fieldops-core/src/services/visit_service.rs
// ============================================================================
//! Visit lifecycle service. Every status change goes through the transition
//! table here before the repository applies it conditionally.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use fieldops_shared::constants::{MAX_NOTES_LENGTH, MAX_TAGS_PER_VISIT, MAX_TAG_LENGTH};
use fieldops_shared::types::Pagination;
use fieldops_shared::utils::{sanitize_opt, sanitize_tags};

use crate::domain::actor::Actor;
use crate::domain::visit::{
    ensure_planned_date_not_past, ensure_transition, GeoPoint, Visit, VisitStatus,
    VisitStatusEvent,
};
use crate::error::DomainError;
use crate::repositories::visit_repository::{
    VisitChanges, VisitFilter, VisitRepository, VisitTransition,
};

/// Input for planning a new visit. `assigned_rep_id` defaults to the caller.
#[derive(Debug, Clone)]
pub struct NewVisit {
    pub customer_id: Uuid,
    pub assigned_rep_id: Option<Uuid>,
    pub planned_date: NaiveDate,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

/// Visit lifecycle service
pub struct VisitService<R: VisitRepository> {
    visit_repo: Arc<R>,
}

impl<R: VisitRepository> VisitService<R> {
    pub fn new(visit_repo: Arc<R>) -> Self {
        Self { visit_repo }
    }

    /// Plan a new visit. Starts in `planned`; the repository writes the
    /// creation history row in the same transaction.
    pub async fn create_visit(&self, actor: &Actor, input: NewVisit) -> Result<Visit, DomainError> {
        // 1. Staff only; reps plan their own visits
        let tenant_id = actor.tenant_scope()?;
        if !actor.role.is_staff() {
            return Err(DomainError::Forbidden(
                "Only tenant staff can plan visits".to_string(),
            ));
        }
        let assigned_rep_id = match input.assigned_rep_id {
            Some(rep) if rep != actor.user_id && !actor.can_assign_other_reps() => {
                warn!(
                    "User {} tried to plan a visit for rep {}",
                    actor.user_id, rep
                );
                return Err(DomainError::Forbidden(
                    "Only supervisors can assign visits to other reps".to_string(),
                ));
            }
            Some(rep) => rep,
            None => actor.user_id,
        };

        // 2. Planned date may not lie in the past
        ensure_planned_date_not_past(input.planned_date, Utc::now().date_naive())?;

        // 3. Clean free-text inputs before anything is persisted
        let notes = sanitize_opt(input.notes.as_deref());
        let tags = sanitize_tags(&input.tags);
        ensure_tags_within_limits(&tags)?;

        // 4. Build and persist
        let visit = Visit::new(
            tenant_id,
            input.customer_id,
            assigned_rep_id,
            input.planned_date,
            notes,
            tags,
            actor.user_id,
        )
        .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        let created = self.visit_repo.create(&visit).await?;

        info!(
            "Visit {} planned for customer {} on {}",
            created.id, created.customer_id, created.planned_date
        );
        Ok(created)
    }

    /// Check in: `planned -> in_progress`.
    pub async fn start_visit(
        &self,
        actor: &Actor,
        visit_id: &Uuid,
        location: Option<GeoPoint>,
    ) -> Result<Visit, DomainError> {
        self.guarded_transition(actor, visit_id, VisitStatus::InProgress, location, None)
            .await
    }

    /// Check out: `in_progress -> completed`.
    pub async fn complete_visit(
        &self,
        actor: &Actor,
        visit_id: &Uuid,
        location: Option<GeoPoint>,
        note: Option<String>,
    ) -> Result<Visit, DomainError> {
        self.guarded_transition(actor, visit_id, VisitStatus::Completed, location, note)
            .await
    }

    /// Cancel from `planned` or `in_progress`. The reason lands on the visit
    /// and in the history row.
    pub async fn cancel_visit(
        &self,
        actor: &Actor,
        visit_id: &Uuid,
        reason: Option<String>,
    ) -> Result<Visit, DomainError> {
        self.guarded_transition(actor, visit_id, VisitStatus::Cancelled, None, reason)
            .await
    }

    /// Mark a `planned` visit that never happened as `missed`.
    pub async fn mark_missed(&self, actor: &Actor, visit_id: &Uuid) -> Result<Visit, DomainError> {
        self.guarded_transition(actor, visit_id, VisitStatus::Missed, None, None)
            .await
    }

    /// Edit non-status fields. Allowed only while the visit is still planned.
    pub async fn update_visit(
        &self,
        actor: &Actor,
        visit_id: &Uuid,
        changes: VisitChanges,
    ) -> Result<Visit, DomainError> {
        // 1. Load within the actor's tenant
        let tenant_id = actor.tenant_scope()?;
        let visit = self
            .visit_repo
            .find_by_id(&tenant_id, visit_id)
            .await?
            .ok_or(DomainError::VisitNotFound)?;

        // 2. Ownership
        if !actor.can_manage_visit(&visit) {
            warn!(
                "User {} denied edit on visit {} of rep {}",
                actor.user_id, visit.id, visit.assigned_rep_id
            );
            return Err(DomainError::Forbidden(
                "Visit belongs to another rep".to_string(),
            ));
        }

        // 3. Edits only before the visit starts
        if !visit.is_editable() {
            return Err(DomainError::VisitNotEditable(visit.status));
        }

        // 4. Validate and clean the changed fields
        if let Some(date) = changes.planned_date {
            ensure_planned_date_not_past(date, Utc::now().date_naive())?;
        }
        let notes = sanitize_opt(changes.notes.as_deref());
        if let Some(n) = &notes {
            if n.chars().count() > MAX_NOTES_LENGTH {
                return Err(DomainError::ValidationError("Notes too long".to_string()));
            }
        }
        let tags = changes.tags.as_deref().map(sanitize_tags);
        if let Some(t) = &tags {
            ensure_tags_within_limits(t)?;
        }

        let cleaned = VisitChanges {
            planned_date: changes.planned_date,
            notes,
            tags,
        };

        // 5. Conditional update; the repository re-checks the planned status
        let updated = self
            .visit_repo
            .update_details(&tenant_id, visit_id, &cleaned, &actor.user_id)
            .await?;

        info!("Visit {} updated by {}", updated.id, actor.user_id);
        Ok(updated)
    }

    pub async fn get_visit(&self, actor: &Actor, visit_id: &Uuid) -> Result<Visit, DomainError> {
        self.ensure_staff(actor)?;
        let tenant_id = actor.tenant_scope()?;
        self.visit_repo
            .find_by_id(&tenant_id, visit_id)
            .await?
            .ok_or(DomainError::VisitNotFound)
    }

    pub async fn list_visits(
        &self,
        actor: &Actor,
        filter: &VisitFilter,
        pagination: Pagination,
    ) -> Result<Vec<Visit>, DomainError> {
        self.ensure_staff(actor)?;
        let tenant_id = actor.tenant_scope()?;
        self.visit_repo
            .list(&tenant_id, filter, pagination.clamped())
            .await
    }

    /// Full status history of one visit, oldest first.
    pub async fn visit_history(
        &self,
        actor: &Actor,
        visit_id: &Uuid,
    ) -> Result<Vec<VisitStatusEvent>, DomainError> {
        self.ensure_staff(actor)?;
        let tenant_id = actor.tenant_scope()?;
        self.visit_repo
            .find_by_id(&tenant_id, visit_id)
            .await?
            .ok_or(DomainError::VisitNotFound)?;
        self.visit_repo.list_events(&tenant_id, visit_id).await
    }

    fn ensure_staff(&self, actor: &Actor) -> Result<(), DomainError> {
        if actor.role.is_staff() {
            Ok(())
        } else {
            Err(DomainError::Forbidden(
                "Visits are only visible to tenant staff".to_string(),
            ))
        }
    }

    async fn guarded_transition(
        &self,
        actor: &Actor,
        visit_id: &Uuid,
        to: VisitStatus,
        location: Option<GeoPoint>,
        note: Option<String>,
    ) -> Result<Visit, DomainError> {
        // 1. Load within the actor's tenant
        let tenant_id = actor.tenant_scope()?;
        let visit = self
            .visit_repo
            .find_by_id(&tenant_id, visit_id)
            .await?
            .ok_or(DomainError::VisitNotFound)?;

        // 2. Ownership
        if !actor.can_manage_visit(&visit) {
            warn!(
                "User {} denied {} on visit {} of rep {}",
                actor.user_id, to, visit.id, visit.assigned_rep_id
            );
            return Err(DomainError::Forbidden(
                "Visit belongs to another rep".to_string(),
            ));
        }

        // 3. Transition table check before any write
        ensure_transition(visit.status, to)?;

        // 4. Validate and clean attachments
        if let Some(loc) = &location {
            loc.validate()
                .map_err(|e| DomainError::ValidationError(e.to_string()))?;
        }
        let note = sanitize_opt(note.as_deref());

        // 5. Conditional update. A lost race surfaces here as
        //    InvalidStatusTransition carrying the status that won.
        let transition = VisitTransition {
            from: visit.status,
            to,
            at: Utc::now(),
            location,
            note,
            changed_by: actor.user_id,
        };
        let updated = self
            .visit_repo
            .apply_transition(&tenant_id, visit_id, transition)
            .await?;

        info!("Visit {} moved {} -> {}", updated.id, visit.status, to);
        Ok(updated)
    }
}

fn ensure_tags_within_limits(tags: &[String]) -> Result<(), DomainError> {
    if tags.len() > MAX_TAGS_PER_VISIT {
        return Err(DomainError::ValidationError(format!(
            "At most {MAX_TAGS_PER_VISIT} tags per visit"
        )));
    }
    if tags.iter().any(|t| t.chars().count() > MAX_TAG_LENGTH) {
        return Err(DomainError::ValidationError("Tag too long".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Role;
    use crate::repositories::visit_repository::MockVisitRepository;
    use chrono::Duration;

    fn actor(tenant_id: Uuid, role: Role) -> Actor {
        Actor {
            user_id: Uuid::new_v4(),
            tenant_id: Some(tenant_id),
            role,
        }
    }

    fn visit_with_status(tenant_id: Uuid, rep_id: Uuid, status: VisitStatus) -> Visit {
        let mut visit = Visit::new(
            tenant_id,
            Uuid::new_v4(),
            rep_id,
            Utc::now().date_naive(),
            None,
            vec![],
            rep_id,
        )
        .unwrap();
        visit.status = status;
        visit
    }

    fn service(repo: MockVisitRepository) -> VisitService<MockVisitRepository> {
        VisitService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_start_planned_visit_succeeds() {
        let tenant_id = Uuid::new_v4();
        let rep = actor(tenant_id, Role::SalesRep);
        let visit = visit_with_status(tenant_id, rep.user_id, VisitStatus::Planned);
        let visit_id = visit.id;

        let mut repo = MockVisitRepository::new();
        let found = visit.clone();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(found.clone())));
        repo.expect_apply_transition()
            .withf(move |_, id, tr| {
                *id == visit_id
                    && tr.from == VisitStatus::Planned
                    && tr.to == VisitStatus::InProgress
            })
            .returning(move |_, _, tr| {
                let mut updated = visit.clone();
                updated.status = tr.to;
                updated.started_at = Some(tr.at);
                Ok(updated)
            });

        let result = service(repo)
            .start_visit(&rep, &visit_id, Some(GeoPoint { latitude: 1.0, longitude: 2.0 }))
            .await
            .unwrap();
        assert_eq!(result.status, VisitStatus::InProgress);
        assert!(result.started_at.is_some());
    }

    #[tokio::test]
    async fn test_complete_requires_in_progress() {
        let tenant_id = Uuid::new_v4();
        let rep = actor(tenant_id, Role::SalesRep);
        let visit = visit_with_status(tenant_id, rep.user_id, VisitStatus::Planned);
        let visit_id = visit.id;

        let mut repo = MockVisitRepository::new();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(visit.clone())));
        // No apply_transition expectation: the guard must reject first.

        let err = service(repo)
            .complete_visit(&rep, &visit_id, None, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidStatusTransition {
                from: VisitStatus::Planned,
                to: VisitStatus::Completed,
            }
        ));
    }

    #[tokio::test]
    async fn test_cancel_completed_visit_fails() {
        let tenant_id = Uuid::new_v4();
        let rep = actor(tenant_id, Role::SalesRep);
        let visit = visit_with_status(tenant_id, rep.user_id, VisitStatus::Completed);
        let visit_id = visit.id;

        let mut repo = MockVisitRepository::new();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(visit.clone())));

        let err = service(repo)
            .cancel_visit(&rep, &visit_id, Some("too late".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidStatusTransition {
                from: VisitStatus::Completed,
                to: VisitStatus::Cancelled,
            }
        ));
    }

    #[tokio::test]
    async fn test_double_cancel_fails_like_any_bad_transition() {
        let tenant_id = Uuid::new_v4();
        let rep = actor(tenant_id, Role::SalesRep);
        let visit = visit_with_status(tenant_id, rep.user_id, VisitStatus::Cancelled);
        let visit_id = visit.id;

        let mut repo = MockVisitRepository::new();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(visit.clone())));

        let err = service(repo)
            .cancel_visit(&rep, &visit_id, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidStatusTransition {
                from: VisitStatus::Cancelled,
                to: VisitStatus::Cancelled,
            }
        ));
    }

    #[tokio::test]
    async fn test_other_rep_cannot_start_visit() {
        let tenant_id = Uuid::new_v4();
        let intruder = actor(tenant_id, Role::SalesRep);
        let visit = visit_with_status(tenant_id, Uuid::new_v4(), VisitStatus::Planned);
        let visit_id = visit.id;

        let mut repo = MockVisitRepository::new();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(visit.clone())));

        let err = service(repo)
            .start_visit(&intruder, &visit_id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_supervisor_can_cancel_any_visit_in_tenant() {
        let tenant_id = Uuid::new_v4();
        let supervisor = actor(tenant_id, Role::Supervisor);
        let visit = visit_with_status(tenant_id, Uuid::new_v4(), VisitStatus::InProgress);
        let visit_id = visit.id;

        let mut repo = MockVisitRepository::new();
        let found = visit.clone();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(found.clone())));
        repo.expect_apply_transition()
            .withf(|_, _, tr| tr.to == VisitStatus::Cancelled && tr.note.as_deref() == Some("store closed"))
            .returning(move |_, _, tr| {
                let mut updated = visit.clone();
                updated.status = tr.to;
                updated.cancel_reason = tr.note.clone();
                Ok(updated)
            });

        let result = service(repo)
            .cancel_visit(&supervisor, &visit_id, Some("store closed".to_string()))
            .await
            .unwrap();
        assert_eq!(result.status, VisitStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_visit_in_other_tenant_is_not_found() {
        let rep = actor(Uuid::new_v4(), Role::SalesRep);

        let mut repo = MockVisitRepository::new();
        // Tenant-scoped lookup misses rows of other tenants.
        repo.expect_find_by_id().returning(|_, _| Ok(None));

        let err = service(repo)
            .start_visit(&rep, &Uuid::new_v4(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::VisitNotFound));
    }

    #[tokio::test]
    async fn test_create_rejects_past_planned_date() {
        let rep = actor(Uuid::new_v4(), Role::SalesRep);
        let input = NewVisit {
            customer_id: Uuid::new_v4(),
            assigned_rep_id: None,
            planned_date: Utc::now().date_naive() - Duration::days(1),
            notes: None,
            tags: vec![],
        };

        let repo = MockVisitRepository::new();
        let err = service(repo).create_visit(&rep, input).await.unwrap_err();
        assert!(matches!(err, DomainError::PlannedDateInPast(_)));
    }

    #[tokio::test]
    async fn test_create_sanitizes_notes_and_tags() {
        let rep = actor(Uuid::new_v4(), Role::SalesRep);
        let input = NewVisit {
            customer_id: Uuid::new_v4(),
            assigned_rep_id: None,
            planned_date: Utc::now().date_naive() + Duration::days(7),
            notes: Some("Hello\x00World\x1F".to_string()),
            tags: vec![
                "Test\x00String".to_string(),
                "Normal String".to_string(),
                "\x1FAnother\x7F".to_string(),
            ],
        };

        let mut repo = MockVisitRepository::new();
        repo.expect_create()
            .withf(|v| {
                v.notes.as_deref() == Some("HelloWorld")
                    && v.tags == ["TestString", "Normal String", "Another"]
            })
            .returning(|v| Ok(v.clone()));

        let created = service(repo).create_visit(&rep, input).await.unwrap();
        assert_eq!(created.status, VisitStatus::Planned);
        assert_eq!(created.assigned_rep_id, rep.user_id);
    }

    #[tokio::test]
    async fn test_rep_cannot_plan_visit_for_other_rep() {
        let rep = actor(Uuid::new_v4(), Role::SalesRep);
        let input = NewVisit {
            customer_id: Uuid::new_v4(),
            assigned_rep_id: Some(Uuid::new_v4()),
            planned_date: Utc::now().date_naive(),
            notes: None,
            tags: vec![],
        };

        let repo = MockVisitRepository::new();
        let err = service(repo).create_visit(&rep, input).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_supervisor_assigns_visit_to_rep() {
        let tenant_id = Uuid::new_v4();
        let supervisor = actor(tenant_id, Role::Supervisor);
        let rep_id = Uuid::new_v4();
        let input = NewVisit {
            customer_id: Uuid::new_v4(),
            assigned_rep_id: Some(rep_id),
            planned_date: Utc::now().date_naive(),
            notes: None,
            tags: vec![],
        };

        let mut repo = MockVisitRepository::new();
        repo.expect_create()
            .withf(move |v| v.assigned_rep_id == rep_id)
            .returning(|v| Ok(v.clone()));

        let created = service(repo).create_visit(&supervisor, input).await.unwrap();
        assert_eq!(created.assigned_rep_id, rep_id);
    }

    #[tokio::test]
    async fn test_update_rejected_after_start() {
        let tenant_id = Uuid::new_v4();
        let rep = actor(tenant_id, Role::SalesRep);
        let visit = visit_with_status(tenant_id, rep.user_id, VisitStatus::InProgress);
        let visit_id = visit.id;

        let mut repo = MockVisitRepository::new();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(visit.clone())));

        let err = service(repo)
            .update_visit(&rep, &visit_id, VisitChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::VisitNotEditable(VisitStatus::InProgress)
        ));
    }

    #[tokio::test]
    async fn test_update_sanitizes_changed_fields() {
        let tenant_id = Uuid::new_v4();
        let rep = actor(tenant_id, Role::SalesRep);
        let visit = visit_with_status(tenant_id, rep.user_id, VisitStatus::Planned);
        let visit_id = visit.id;
        let new_date = Utc::now().date_naive() + Duration::days(3);

        let mut repo = MockVisitRepository::new();
        let found = visit.clone();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(found.clone())));
        repo.expect_update_details()
            .withf(move |_, _, changes, _| {
                changes.notes.as_deref() == Some("rescheduled")
                    && changes.planned_date == Some(new_date)
            })
            .returning(move |_, _, changes, _| {
                let mut updated = visit.clone();
                updated.notes = changes.notes.clone();
                updated.planned_date = changes.planned_date.unwrap();
                Ok(updated)
            });

        let changes = VisitChanges {
            planned_date: Some(new_date),
            notes: Some("  rescheduled\x07".to_string()),
            tags: None,
        };
        let updated = service(repo)
            .update_visit(&rep, &visit_id, changes)
            .await
            .unwrap();
        assert_eq!(updated.notes.as_deref(), Some("rescheduled"));
    }

    #[tokio::test]
    async fn test_lost_race_surfaces_conflict_from_repository() {
        let tenant_id = Uuid::new_v4();
        let rep = actor(tenant_id, Role::SalesRep);
        let visit = visit_with_status(tenant_id, rep.user_id, VisitStatus::Planned);
        let visit_id = visit.id;

        let mut repo = MockVisitRepository::new();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(visit.clone())));
        // Another request won between the read and the conditional update.
        repo.expect_apply_transition().returning(|_, _, tr| {
            Err(DomainError::InvalidStatusTransition {
                from: VisitStatus::InProgress,
                to: tr.to,
            })
        });

        let err = service(repo)
            .start_visit(&rep, &visit_id, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidStatusTransition {
                from: VisitStatus::InProgress,
                to: VisitStatus::InProgress,
            }
        ));
    }

    #[tokio::test]
    async fn test_mark_missed_from_planned() {
        let tenant_id = Uuid::new_v4();
        let rep = actor(tenant_id, Role::SalesRep);
        let visit = visit_with_status(tenant_id, rep.user_id, VisitStatus::Planned);
        let visit_id = visit.id;

        let mut repo = MockVisitRepository::new();
        let found = visit.clone();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(found.clone())));
        repo.expect_apply_transition()
            .withf(|_, _, tr| tr.from == VisitStatus::Planned && tr.to == VisitStatus::Missed)
            .returning(move |_, _, tr| {
                let mut updated = visit.clone();
                updated.status = tr.to;
                Ok(updated)
            });

        let result = service(repo).mark_missed(&rep, &visit_id).await.unwrap();
        assert_eq!(result.status, VisitStatus::Missed);
    }

    #[tokio::test]
    async fn test_history_requires_existing_visit() {
        let rep = actor(Uuid::new_v4(), Role::SalesRep);

        let mut repo = MockVisitRepository::new();
        repo.expect_find_by_id().returning(|_, _| Ok(None));

        let err = service(repo)
            .visit_history(&rep, &Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::VisitNotFound));
    }

    #[tokio::test]
    async fn test_customer_role_cannot_list_visits() {
        let portal_user = actor(Uuid::new_v4(), Role::Customer);

        let repo = MockVisitRepository::new();
        let err = service(repo)
            .list_visits(&portal_user, &VisitFilter::default(), Pagination::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_too_many_tags() {
        let rep = actor(Uuid::new_v4(), Role::SalesRep);
        let input = NewVisit {
            customer_id: Uuid::new_v4(),
            assigned_rep_id: None,
            planned_date: Utc::now().date_naive(),
            notes: None,
            tags: (0..21).map(|i| format!("tag-{i}")).collect(),
        };

        let repo = MockVisitRepository::new();
        let err = service(repo).create_visit(&rep, input).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }
}
