//! Export request endpoints. Requests are queued rows picked up by an
//! external worker; rows are never deleted and only their status moves.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use fieldops_core::domain::actor::Actor;
use fieldops_core::domain::export::{ExportFormat, ExportResource, ExportStatus};
use fieldops_core::domain::user::Role;
use fieldops_core::domain::ExportRequest;
use fieldops_core::error::DomainError;
use fieldops_core::repositories::ExportRepository;

use super::{staff_scope, write_scope};
use crate::dto::PageQuery;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateExportRequest {
    pub resource: String,
    pub format: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateExportRequest {
    pub status: String,
    pub file_path: Option<String>,
}

/// POST /api/v1/exports
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateExportRequest>,
) -> Result<Json<ApiResponse<ExportRequest>>, ApiError> {
    let tenant_id = staff_scope(&actor)?;

    let resource = ExportResource::from_str(&payload.resource).ok_or_else(|| {
        ApiError::validation(format!("Unknown export resource: {}", payload.resource))
    })?;
    let format = ExportFormat::from_str(&payload.format)
        .ok_or_else(|| ApiError::validation(format!("Unknown export format: {}", payload.format)))?;

    let export = ExportRequest::new(tenant_id, actor.user_id, resource, format);
    let created = state.export_repo.create(&export).await?;
    Ok(Json(ApiResponse::success(created)))
}

/// GET /api/v1/exports
pub async fn list(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<ExportRequest>>>, ApiError> {
    let tenant_id = staff_scope(&actor)?;
    let exports = state
        .export_repo
        .list(&tenant_id, page.pagination())
        .await?;
    Ok(Json(ApiResponse::success(exports)))
}

/// GET /api/v1/exports/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ExportRequest>>, ApiError> {
    let tenant_id = staff_scope(&actor)?;
    let export = state
        .export_repo
        .find_by_id(&tenant_id, &id)
        .await?
        .ok_or(DomainError::ExportNotFound)?;
    Ok(Json(ApiResponse::success(export)))
}

/// PATCH /api/v1/exports/{id}
///
/// Admin-only status flip used by the worker once a file lands (or fails).
pub async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateExportRequest>,
) -> Result<Json<ApiResponse<ExportRequest>>, ApiError> {
    let tenant_id = write_scope(&actor, &[Role::Admin])?;

    let status = ExportStatus::from_str(&payload.status)
        .ok_or_else(|| ApiError::validation(format!("Unknown export status: {}", payload.status)))?;

    let mut export = state
        .export_repo
        .find_by_id(&tenant_id, &id)
        .await?
        .ok_or(DomainError::ExportNotFound)?;

    export.status = status;
    if payload.file_path.is_some() {
        export.file_path = payload.file_path;
    }
    export.modified_at = Some(Utc::now());

    let updated = state.export_repo.update(&export).await?;
    Ok(Json(ApiResponse::success(updated)))
}
