// ============================================================================
// FieldOps API - User Handlers
// File: crates/fieldops-api/src/handlers/users.rs
// ============================================================================
//! Staff account administration

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use fieldops_core::domain::actor::Actor;
use fieldops_core::domain::user::Role;
use fieldops_core::services::{NewUser, UserChanges};

use crate::dto::{PageQuery, UserDto};
use crate::error::{validate_payload, ApiError};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Platform admins may target any tenant; everyone else their own.
    pub tenant_id: Option<Uuid>,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(length(min = 2, max = 120, message = "Display name must be 2-120 characters"))]
    pub display_name: String,

    pub role: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 120, message = "Display name must be 2-120 characters"))]
    pub display_name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

fn parse_role(s: &str) -> Result<Role, ApiError> {
    Role::from_str(s).ok_or_else(|| ApiError::validation(format!("Unknown role: {s}")))
}

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    validate_payload(&payload)?;
    let role = parse_role(&payload.role)?;
    let user = state
        .user_service
        .create_user(
            &actor,
            NewUser {
                tenant_id: payload.tenant_id,
                email: payload.email,
                password: payload.password,
                display_name: payload.display_name,
                role,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(UserDto::from(&user))))
}

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state
        .user_service
        .list_users(&actor, page.pagination())
        .await?;
    Ok(Json(ApiResponse::success(
        users.iter().map(UserDto::from).collect(),
    )))
}

/// GET /api/v1/users/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.user_service.get_user(&actor, &id).await?;
    Ok(Json(ApiResponse::success(UserDto::from(&user))))
}

/// PATCH /api/v1/users/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    validate_payload(&payload)?;
    let role = payload.role.as_deref().map(parse_role).transpose()?;
    let user = state
        .user_service
        .update_user(
            &actor,
            &id,
            UserChanges {
                display_name: payload.display_name,
                role,
                is_active: payload.is_active,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(UserDto::from(&user))))
}

/// DELETE /api/v1/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.user_service.deactivate_user(&actor, &id).await?;
    Ok(Json(ApiResponse::success(UserDto::from(&user))))
}
