//! Brand CRUD, tenant scoped

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use fieldops_core::domain::actor::Actor;
use fieldops_core::domain::user::Role;
use fieldops_core::domain::Brand;
use fieldops_core::error::DomainError;
use fieldops_core::repositories::BrandRepository;
use fieldops_shared::utils::sanitize_opt;

use super::{staff_scope, write_scope};
use crate::dto::PageQuery;
use crate::error::{validate_payload, ApiError};
use crate::response::ApiResponse;
use crate::state::AppState;

const WRITE_ROLES: &[Role] = &[Role::Admin];

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBrandRequest {
    #[validate(length(min = 2, max = 120, message = "Name must be 2-120 characters"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBrandRequest {
    #[validate(length(min = 2, max = 120, message = "Name must be 2-120 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// POST /api/v1/brands
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateBrandRequest>,
) -> Result<Json<ApiResponse<Brand>>, ApiError> {
    let tenant_id = write_scope(&actor, WRITE_ROLES)?;
    validate_payload(&payload)?;

    let brand = Brand::new(
        tenant_id,
        payload.name,
        sanitize_opt(payload.description.as_deref()),
        Some(actor.user_id),
    )
    .map_err(|e| DomainError::ValidationError(e.to_string()))?;

    let created = state.brand_repo.create(&brand).await?;
    Ok(Json(ApiResponse::success(created)))
}

/// GET /api/v1/brands
pub async fn list(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Brand>>>, ApiError> {
    let tenant_id = staff_scope(&actor)?;
    let brands = state.brand_repo.list(&tenant_id, page.pagination()).await?;
    Ok(Json(ApiResponse::success(brands)))
}

/// GET /api/v1/brands/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Brand>>, ApiError> {
    let tenant_id = staff_scope(&actor)?;
    let brand = state
        .brand_repo
        .find_by_id(&tenant_id, &id)
        .await?
        .ok_or(DomainError::BrandNotFound)?;
    Ok(Json(ApiResponse::success(brand)))
}

/// PATCH /api/v1/brands/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBrandRequest>,
) -> Result<Json<ApiResponse<Brand>>, ApiError> {
    let tenant_id = write_scope(&actor, WRITE_ROLES)?;
    validate_payload(&payload)?;

    let mut brand = state
        .brand_repo
        .find_by_id(&tenant_id, &id)
        .await?
        .ok_or(DomainError::BrandNotFound)?;

    if let Some(name) = payload.name {
        brand.name = name;
    }
    if let Some(description) = payload.description {
        brand.description = sanitize_opt(Some(&description));
    }
    if let Some(is_active) = payload.is_active {
        brand.is_active = is_active;
    }
    brand.modified_at = Some(Utc::now());
    brand.modified_by = Some(actor.user_id);

    let updated = state.brand_repo.update(&brand).await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// DELETE /api/v1/brands/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let tenant_id = write_scope(&actor, WRITE_ROLES)?;
    state
        .brand_repo
        .soft_delete(&tenant_id, &id, &actor.user_id)
        .await?;
    Ok(Json(ApiResponse::success(())))
}
