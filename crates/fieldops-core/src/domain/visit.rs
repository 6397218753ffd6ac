// ============================================================================
// FieldOps Core - Visit Entity
// File: crates/fieldops-core/src/domain/visit.rs
// Description: Field visit lifecycle with a guarded status transition table
// ============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::DomainError;

/// Visit status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
    Missed,
}

/// Every allowed status change. Pairs not listed here are rejected,
/// which also makes completed, cancelled and missed terminal.
pub const ALLOWED_TRANSITIONS: [(VisitStatus, VisitStatus); 5] = [
    (VisitStatus::Planned, VisitStatus::InProgress),
    (VisitStatus::Planned, VisitStatus::Cancelled),
    (VisitStatus::Planned, VisitStatus::Missed),
    (VisitStatus::InProgress, VisitStatus::Completed),
    (VisitStatus::InProgress, VisitStatus::Cancelled),
];

impl VisitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::Planned => "planned",
            VisitStatus::InProgress => "in_progress",
            VisitStatus::Completed => "completed",
            VisitStatus::Cancelled => "cancelled",
            VisitStatus::Missed => "missed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "planned" => Some(VisitStatus::Planned),
            "in_progress" => Some(VisitStatus::InProgress),
            "completed" => Some(VisitStatus::Completed),
            "cancelled" => Some(VisitStatus::Cancelled),
            "missed" => Some(VisitStatus::Missed),
            _ => None,
        }
    }

    pub fn can_transition_to(&self, to: VisitStatus) -> bool {
        ALLOWED_TRANSITIONS.contains(&(*self, to))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            VisitStatus::Completed | VisitStatus::Cancelled | VisitStatus::Missed
        )
    }
}

impl Default for VisitStatus {
    fn default() -> Self {
        VisitStatus::Planned
    }
}

impl std::fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks the transition table and reports the offending pair on failure.
pub fn ensure_transition(from: VisitStatus, to: VisitStatus) -> Result<(), DomainError> {
    if from.can_transition_to(to) {
        return Ok(());
    }
    Err(DomainError::InvalidStatusTransition { from, to })
}

/// New and rescheduled visits may not land on a date already past.
/// `today` is passed in so callers control the clock.
pub fn ensure_planned_date_not_past(
    planned: NaiveDate,
    today: NaiveDate,
) -> Result<(), DomainError> {
    if planned < today {
        return Err(DomainError::PlannedDateInPast(planned));
    }
    Ok(())
}

/// GPS coordinates captured when a rep checks in or out of a visit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeoPoint {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude out of range"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude out of range"))]
    pub longitude: f64,
}

/// Visit entity (planned customer call by a sales rep)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Visit {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub customer_id: Uuid,
    pub assigned_rep_id: Uuid,

    pub status: VisitStatus,
    pub planned_date: NaiveDate,

    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,

    #[validate(nested)]
    pub start_location: Option<GeoPoint>,
    #[validate(nested)]
    pub end_location: Option<GeoPoint>,

    #[validate(length(max = 4000, message = "Notes too long"))]
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub cancel_reason: Option<String>,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl Visit {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: Uuid,
        customer_id: Uuid,
        assigned_rep_id: Uuid,
        planned_date: NaiveDate,
        notes: Option<String>,
        tags: Vec<String>,
        created_by: Uuid,
    ) -> Result<Self, validator::ValidationErrors> {
        let visit = Self {
            id: Uuid::new_v4(),
            tenant_id,
            customer_id,
            assigned_rep_id,
            status: VisitStatus::Planned,
            planned_date,
            started_at: None,
            completed_at: None,
            start_location: None,
            end_location: None,
            notes,
            tags,
            cancel_reason: None,
            created_at: Utc::now(),
            created_by: Some(created_by),
            modified_at: None,
            modified_by: None,
            removed_at: None,
            removed_by: None,
        };

        visit.validate()?;
        Ok(visit)
    }

    /// Non-status fields accept edits only before the visit starts.
    pub fn is_editable(&self) -> bool {
        self.status == VisitStatus::Planned
    }

    pub fn is_deleted(&self) -> bool {
        self.removed_at.is_some()
    }
}

/// History row written for every status change, including creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitStatusEvent {
    pub id: Uuid,
    pub visit_id: Uuid,
    pub from_status: Option<VisitStatus>,
    pub to_status: VisitStatus,
    pub note: Option<String>,
    pub changed_by: Uuid,
    pub changed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const ALL: [VisitStatus; 5] = [
        VisitStatus::Planned,
        VisitStatus::InProgress,
        VisitStatus::Completed,
        VisitStatus::Cancelled,
        VisitStatus::Missed,
    ];

    #[test]
    fn test_transitions_from_planned() {
        assert!(VisitStatus::Planned.can_transition_to(VisitStatus::InProgress));
        assert!(VisitStatus::Planned.can_transition_to(VisitStatus::Cancelled));
        assert!(VisitStatus::Planned.can_transition_to(VisitStatus::Missed));
        assert!(!VisitStatus::Planned.can_transition_to(VisitStatus::Completed));
        assert!(!VisitStatus::Planned.can_transition_to(VisitStatus::Planned));
    }

    #[test]
    fn test_transitions_from_in_progress() {
        assert!(VisitStatus::InProgress.can_transition_to(VisitStatus::Completed));
        assert!(VisitStatus::InProgress.can_transition_to(VisitStatus::Cancelled));
        assert!(!VisitStatus::InProgress.can_transition_to(VisitStatus::Planned));
        assert!(!VisitStatus::InProgress.can_transition_to(VisitStatus::Missed));
        assert!(!VisitStatus::InProgress.can_transition_to(VisitStatus::InProgress));
    }

    #[test]
    fn test_terminal_states_allow_nothing() {
        for from in [
            VisitStatus::Completed,
            VisitStatus::Cancelled,
            VisitStatus::Missed,
        ] {
            assert!(from.is_terminal());
            for to in ALL {
                assert!(
                    !from.can_transition_to(to),
                    "{} -> {} should be rejected",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_ensure_transition_reports_pair() {
        let err = ensure_transition(VisitStatus::Cancelled, VisitStatus::Cancelled).unwrap_err();
        match err {
            DomainError::InvalidStatusTransition { from, to } => {
                assert_eq!(from, VisitStatus::Cancelled);
                assert_eq!(to, VisitStatus::Cancelled);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in ALL {
            assert_eq!(VisitStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(VisitStatus::from_str("unknown"), None);
    }

    #[test]
    fn test_planned_date_today_and_future_are_valid() {
        let today = Utc::now().date_naive();
        assert!(ensure_planned_date_not_past(today, today).is_ok());
        assert!(ensure_planned_date_not_past(today + Duration::days(7), today).is_ok());
    }

    #[test]
    fn test_planned_date_in_past_is_rejected() {
        let today = Utc::now().date_naive();
        let yesterday = today - Duration::days(1);
        let err = ensure_planned_date_not_past(yesterday, today).unwrap_err();
        assert!(matches!(err, DomainError::PlannedDateInPast(d) if d == yesterday));
    }

    #[test]
    fn test_new_visit_starts_planned() {
        let visit = Visit::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Utc::now().date_naive(),
            Some("first call".to_string()),
            vec!["intro".to_string()],
            Uuid::new_v4(),
        )
        .unwrap();

        assert_eq!(visit.status, VisitStatus::Planned);
        assert!(visit.is_editable());
        assert!(visit.started_at.is_none());
        assert!(!visit.is_deleted());
    }

    #[test]
    fn test_new_visit_rejects_bad_location_on_validate() {
        let mut visit = Visit::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Utc::now().date_naive(),
            None,
            vec![],
            Uuid::new_v4(),
        )
        .unwrap();

        visit.start_location = Some(GeoPoint {
            latitude: 123.0,
            longitude: 0.0,
        });
        assert!(visit.validate().is_err());
    }
}
