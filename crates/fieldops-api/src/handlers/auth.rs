// ============================================================================
// FieldOps API - Auth Handlers
// File: crates/fieldops-api/src/handlers/auth.rs
// ============================================================================
//! Authentication HTTP handlers (login, refresh, me)

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use fieldops_core::domain::actor::Actor;
use fieldops_core::error::DomainError;
use fieldops_core::services::LoginResult;

use crate::dto::UserDto;
use crate::error::{validate_payload, ApiError};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Authentication response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: AuthUserDto,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthUserDto {
    pub id: String,
    pub tenant_id: Option<String>,
    pub email: String,
    pub display_name: String,
    pub role: String,
}

impl From<LoginResult> for AuthResponse {
    fn from(result: LoginResult) -> Self {
        Self {
            user: AuthUserDto {
                id: result.user.id.to_string(),
                tenant_id: result.user.tenant_id.map(|t| t.to_string()),
                email: result.user.email,
                display_name: result.user.display_name,
                role: result.user.role,
            },
            access_token: result.access_token,
            refresh_token: result.refresh_token,
        }
    }
}

/// Login handler - POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    validate_payload(&payload)?;
    let result = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(ApiResponse::success(result.into())))
}

/// Refresh handler - POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let result = state.auth_service.refresh(&payload.refresh_token).await?;
    Ok(Json(ApiResponse::success(result.into())))
}

/// Current user handler - GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    use fieldops_core::repositories::UserRepository;

    let user = state
        .user_repo
        .find_by_id(&actor.user_id)
        .await?
        .ok_or(DomainError::UserNotFound)?;
    Ok(Json(ApiResponse::success(UserDto::from(&user))))
}
