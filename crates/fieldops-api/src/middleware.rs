//! Request middleware

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use fieldops_core::domain::actor::Actor;
use fieldops_core::domain::user::Role;

use crate::error::ApiError;
use crate::state::AppState;

/// Resolves the Bearer token into an [`Actor`] and stores it as a request
/// extension. Handlers behind this layer can rely on the extension being set.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request)
        .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

    let claims = state
        .jwt
        .validate_token(token)
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;
    if !claims.is_access() {
        return Err(ApiError::unauthorized("Not an access token"));
    }

    let user_id = claims
        .user_id()
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;
    let role = Role::from_str(&claims.role)
        .ok_or_else(|| ApiError::unauthorized("Unknown role on token"))?;

    request.extensions_mut().insert(Actor {
        user_id,
        tenant_id: claims.tenant_id,
        role,
    });

    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
