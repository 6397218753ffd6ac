// ============================================================================
// FieldOps API - Tenant Handlers
// File: crates/fieldops-api/src/handlers/tenants.rs
// ============================================================================
//! Tenant administration (platform super admin only; the service enforces it)

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use fieldops_core::domain::actor::Actor;
use fieldops_core::domain::Tenant;
use fieldops_core::services::{NewTenant, TenantChanges};

use crate::dto::PageQuery;
use crate::error::{validate_payload, ApiError};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTenantRequest {
    #[validate(length(min = 2, max = 120, message = "Name must be 2-120 characters"))]
    pub name: String,

    #[validate(length(min = 2, max = 60, message = "Slug must be 2-60 characters"))]
    pub slug: String,

    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTenantRequest {
    #[validate(length(min = 2, max = 120, message = "Name must be 2-120 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// POST /api/v1/tenants
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateTenantRequest>,
) -> Result<Json<ApiResponse<Tenant>>, ApiError> {
    validate_payload(&payload)?;
    let tenant = state
        .tenant_service
        .create_tenant(
            &actor,
            NewTenant {
                name: payload.name,
                slug: payload.slug,
                description: payload.description,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(tenant)))
}

/// GET /api/v1/tenants
pub async fn list(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Tenant>>>, ApiError> {
    let tenants = state
        .tenant_service
        .list_tenants(&actor, page.pagination())
        .await?;
    Ok(Json(ApiResponse::success(tenants)))
}

/// GET /api/v1/tenants/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Tenant>>, ApiError> {
    let tenant = state.tenant_service.get_tenant(&actor, &id).await?;
    Ok(Json(ApiResponse::success(tenant)))
}

/// PATCH /api/v1/tenants/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTenantRequest>,
) -> Result<Json<ApiResponse<Tenant>>, ApiError> {
    validate_payload(&payload)?;
    let tenant = state
        .tenant_service
        .update_tenant(
            &actor,
            &id,
            TenantChanges {
                name: payload.name,
                description: payload.description,
                is_active: payload.is_active,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(tenant)))
}

/// DELETE /api/v1/tenants/{id}
///
/// Tenants are deactivated rather than removed; their data stays intact.
pub async fn delete(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Tenant>>, ApiError> {
    let tenant = state.tenant_service.deactivate_tenant(&actor, &id).await?;
    Ok(Json(ApiResponse::success(tenant)))
}
