//! Customer tier CRUD. Tiers are a small fixed set per tenant, so the
//! listing endpoint skips pagination and returns them ordered by rank.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use fieldops_core::domain::actor::Actor;
use fieldops_core::domain::user::Role;
use fieldops_core::domain::Tier;
use fieldops_core::error::DomainError;
use fieldops_core::repositories::TierRepository;

use super::{staff_scope, write_scope};
use crate::error::{validate_payload, ApiError};
use crate::response::ApiResponse;
use crate::state::AppState;

const WRITE_ROLES: &[Role] = &[Role::Admin];

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTierRequest {
    #[validate(length(min = 1, max = 60, message = "Name must be 1-60 characters"))]
    pub name: String,

    #[validate(range(min = 0, max = 100, message = "Discount must be 0-100 percent"))]
    pub discount_percent: i32,

    pub rank: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTierRequest {
    #[validate(length(min = 1, max = 60, message = "Name must be 1-60 characters"))]
    pub name: Option<String>,

    #[validate(range(min = 0, max = 100, message = "Discount must be 0-100 percent"))]
    pub discount_percent: Option<i32>,

    pub rank: Option<i32>,
    pub is_active: Option<bool>,
}

/// POST /api/v1/tiers
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateTierRequest>,
) -> Result<Json<ApiResponse<Tier>>, ApiError> {
    let tenant_id = write_scope(&actor, WRITE_ROLES)?;
    validate_payload(&payload)?;

    let tier = Tier::new(
        tenant_id,
        payload.name,
        payload.discount_percent,
        payload.rank,
        Some(actor.user_id),
    )
    .map_err(|e| DomainError::ValidationError(e.to_string()))?;

    let created = state.tier_repo.create(&tier).await?;
    Ok(Json(ApiResponse::success(created)))
}

/// GET /api/v1/tiers
pub async fn list(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<Vec<Tier>>>, ApiError> {
    let tenant_id = staff_scope(&actor)?;
    let tiers = state.tier_repo.list(&tenant_id).await?;
    Ok(Json(ApiResponse::success(tiers)))
}

/// GET /api/v1/tiers/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Tier>>, ApiError> {
    let tenant_id = staff_scope(&actor)?;
    let tier = state
        .tier_repo
        .find_by_id(&tenant_id, &id)
        .await?
        .ok_or(DomainError::TierNotFound)?;
    Ok(Json(ApiResponse::success(tier)))
}

/// PATCH /api/v1/tiers/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTierRequest>,
) -> Result<Json<ApiResponse<Tier>>, ApiError> {
    let tenant_id = write_scope(&actor, WRITE_ROLES)?;
    validate_payload(&payload)?;

    let mut tier = state
        .tier_repo
        .find_by_id(&tenant_id, &id)
        .await?
        .ok_or(DomainError::TierNotFound)?;

    if let Some(name) = payload.name {
        tier.name = name;
    }
    if let Some(discount) = payload.discount_percent {
        tier.discount_percent = discount;
    }
    if let Some(rank) = payload.rank {
        tier.rank = rank;
    }
    if let Some(is_active) = payload.is_active {
        tier.is_active = is_active;
    }
    tier.modified_at = Some(Utc::now());
    tier.modified_by = Some(actor.user_id);

    let updated = state.tier_repo.update(&tier).await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// DELETE /api/v1/tiers/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let tenant_id = write_scope(&actor, WRITE_ROLES)?;
    state
        .tier_repo
        .soft_delete(&tenant_id, &id, &actor.user_id)
        .await?;
    Ok(Json(ApiResponse::success(())))
}
