// ============================================================================
// FieldOps API - Visit Handlers
// File: crates/fieldops-api/src/handlers/visits.rs
// ============================================================================
//! Visit lifecycle endpoints. All authorization and transition checks live
//! in the visit service; handlers only translate HTTP in and out.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use fieldops_core::domain::actor::Actor;
use fieldops_core::domain::visit::{Visit, VisitStatus, VisitStatusEvent};
use fieldops_core::repositories::{VisitChanges, VisitFilter};
use fieldops_core::services::NewVisit;

use crate::dto::{LocationDto, PageQuery};
use crate::error::{validate_payload, ApiError};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVisitRequest {
    pub customer_id: Uuid,
    /// Omitted: the visit is planned for the caller themselves.
    pub assigned_rep_id: Option<Uuid>,
    pub planned_date: NaiveDate,

    #[validate(length(max = 4000, message = "Notes too long"))]
    pub notes: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVisitRequest {
    pub planned_date: Option<NaiveDate>,

    #[validate(length(max = 4000, message = "Notes too long"))]
    pub notes: Option<String>,

    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct StartVisitRequest {
    #[validate(nested)]
    pub location: Option<LocationDto>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CompleteVisitRequest {
    #[validate(nested)]
    pub location: Option<LocationDto>,

    #[validate(length(max = 4000, message = "Note too long"))]
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CancelVisitRequest {
    #[validate(length(max = 500, message = "Reason too long"))]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VisitListQuery {
    pub status: Option<String>,
    pub assigned_rep_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl VisitListQuery {
    fn page(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }

    fn filter(&self) -> Result<VisitFilter, ApiError> {
        let status = match &self.status {
            Some(s) => Some(
                VisitStatus::from_str(s)
                    .ok_or_else(|| ApiError::validation(format!("Unknown visit status: {s}")))?,
            ),
            None => None,
        };
        Ok(VisitFilter {
            status,
            assigned_rep_id: self.assigned_rep_id,
            customer_id: self.customer_id,
            date_from: self.date_from,
            date_to: self.date_to,
        })
    }
}

/// POST /api/v1/visits
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateVisitRequest>,
) -> Result<Json<ApiResponse<Visit>>, ApiError> {
    validate_payload(&payload)?;

    let input = NewVisit {
        customer_id: payload.customer_id,
        assigned_rep_id: payload.assigned_rep_id,
        planned_date: payload.planned_date,
        notes: payload.notes,
        tags: payload.tags,
    };
    let visit = state.visit_service.create_visit(&actor, input).await?;
    Ok(Json(ApiResponse::success(visit)))
}

/// GET /api/v1/visits
pub async fn list(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<VisitListQuery>,
) -> Result<Json<ApiResponse<Vec<Visit>>>, ApiError> {
    let filter = query.filter()?;
    let visits = state
        .visit_service
        .list_visits(&actor, &filter, query.page().pagination())
        .await?;
    Ok(Json(ApiResponse::success(visits)))
}

/// GET /api/v1/visits/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Visit>>, ApiError> {
    let visit = state.visit_service.get_visit(&actor, &id).await?;
    Ok(Json(ApiResponse::success(visit)))
}

/// PATCH /api/v1/visits/{id}
///
/// Non-status fields only, and only while the visit is still planned.
pub async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVisitRequest>,
) -> Result<Json<ApiResponse<Visit>>, ApiError> {
    validate_payload(&payload)?;

    let changes = VisitChanges {
        planned_date: payload.planned_date,
        notes: payload.notes,
        tags: payload.tags,
    };
    let visit = state.visit_service.update_visit(&actor, &id, changes).await?;
    Ok(Json(ApiResponse::success(visit)))
}

/// POST /api/v1/visits/{id}/start
pub async fn start(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StartVisitRequest>,
) -> Result<Json<ApiResponse<Visit>>, ApiError> {
    validate_payload(&payload)?;

    let visit = state
        .visit_service
        .start_visit(&actor, &id, payload.location.map(Into::into))
        .await?;
    Ok(Json(ApiResponse::success(visit)))
}

/// POST /api/v1/visits/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteVisitRequest>,
) -> Result<Json<ApiResponse<Visit>>, ApiError> {
    validate_payload(&payload)?;

    let visit = state
        .visit_service
        .complete_visit(&actor, &id, payload.location.map(Into::into), payload.note)
        .await?;
    Ok(Json(ApiResponse::success(visit)))
}

/// POST /api/v1/visits/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelVisitRequest>,
) -> Result<Json<ApiResponse<Visit>>, ApiError> {
    validate_payload(&payload)?;

    let visit = state
        .visit_service
        .cancel_visit(&actor, &id, payload.reason)
        .await?;
    Ok(Json(ApiResponse::success(visit)))
}

/// POST /api/v1/visits/{id}/miss
pub async fn miss(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Visit>>, ApiError> {
    let visit = state.visit_service.mark_missed(&actor, &id).await?;
    Ok(Json(ApiResponse::success(visit)))
}

/// GET /api/v1/visits/{id}/history
pub async fn history(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<VisitStatusEvent>>>, ApiError> {
    let events = state.visit_service.visit_history(&actor, &id).await?;
    Ok(Json(ApiResponse::success(events)))
}
