//! HTTP error mapping for domain and auth failures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use fieldops_core::error::DomainError;

use crate::response::ApiResponse;

/// Error surfaced to HTTP clients. Carries a stable machine-readable code
/// next to the status; 5xx detail stays in the logs only.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{1}")]
    Unauthorized(&'static str, String),

    #[error("{1}")]
    Forbidden(&'static str, String),

    #[error("{1}")]
    NotFound(&'static str, String),

    #[error("{1}")]
    Validation(&'static str, String),

    #[error("{1}")]
    Conflict(&'static str, String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized("UNAUTHORIZED", message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation("VALIDATION_ERROR", message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(..) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(..) => StatusCode::FORBIDDEN,
            ApiError::NotFound(..) => StatusCode::NOT_FOUND,
            ApiError::Validation(..) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(..) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(code, _)
            | ApiError::Forbidden(code, _)
            | ApiError::NotFound(code, _)
            | ApiError::Validation(code, _)
            | ApiError::Conflict(code, _) => code,
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidCredentials => {
                ApiError::Unauthorized("INVALID_CREDENTIALS", "Invalid credentials".to_string())
            }
            DomainError::UserNotActive => {
                ApiError::Forbidden("USER_NOT_ACTIVE", "Account is not active".to_string())
            }
            DomainError::TenantNotActive => {
                ApiError::Forbidden("TENANT_NOT_ACTIVE", "Tenant is not active".to_string())
            }
            DomainError::Forbidden(msg) => ApiError::Forbidden("FORBIDDEN", msg),

            DomainError::UserNotFound
            | DomainError::TenantNotFound
            | DomainError::CustomerNotFound
            | DomainError::BrandNotFound
            | DomainError::TierNotFound
            | DomainError::ProductNotFound
            | DomainError::OrderNotFound
            | DomainError::ExportNotFound
            | DomainError::VisitNotFound => {
                ApiError::NotFound("NOT_FOUND", err.to_string())
            }

            DomainError::InvalidStatusTransition { from, to } => ApiError::Conflict(
                "INVALID_STATUS_TRANSITION",
                format!("Invalid status transition: {from} -> {to}"),
            ),
            DomainError::VisitNotEditable(status) => ApiError::Conflict(
                "VISIT_NOT_EDITABLE",
                format!("Visit can only be edited while planned, current status: {status}"),
            ),

            DomainError::EmailAlreadyExists(email) => ApiError::Conflict(
                "EMAIL_EXISTS",
                format!("Email already exists: {email}"),
            ),
            DomainError::TenantSlugAlreadyExists(slug) => ApiError::Conflict(
                "TENANT_SLUG_EXISTS",
                format!("Tenant slug already exists: {slug}"),
            ),
            DomainError::TenantNameAlreadyExists(name) => ApiError::Conflict(
                "TENANT_NAME_EXISTS",
                format!("Tenant name already exists: {name}"),
            ),
            DomainError::BrandNameAlreadyExists(name) => ApiError::Conflict(
                "BRAND_NAME_EXISTS",
                format!("Brand name already exists: {name}"),
            ),
            DomainError::TierNameAlreadyExists(name) => ApiError::Conflict(
                "TIER_NAME_EXISTS",
                format!("Tier name already exists: {name}"),
            ),
            DomainError::SkuAlreadyExists(sku) => {
                ApiError::Conflict("SKU_EXISTS", format!("Product SKU already exists: {sku}"))
            }

            DomainError::PlannedDateInPast(date) => ApiError::Validation(
                "VALIDATION_ERROR",
                format!("Planned date is in the past: {date}"),
            ),
            DomainError::ValidationError(msg) => {
                ApiError::Validation("VALIDATION_ERROR", msg)
            }

            DomainError::PasswordHashError(msg)
            | DomainError::TokenGenerationError(msg)
            | DomainError::DatabaseError(msg)
            | DomainError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        // 5xx detail goes to the logs; the client sees an opaque message.
        let message = if status.is_server_error() {
            tracing::error!("Internal error: {}", self);
            "Internal server error".to_string()
        } else {
            tracing::warn!("{}: {}", code, self);
            self.to_string()
        };

        let body = Json(ApiResponse::<()>::error(code, &message));
        (status, body).into_response()
    }
}

/// Runs `validator` checks on a request DTO before any service call.
pub fn validate_payload<T: validator::Validate>(payload: &T) -> Result<(), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldops_core::domain::visit::VisitStatus;

    #[test]
    fn test_invalid_transition_maps_to_conflict() {
        let err: ApiError = DomainError::InvalidStatusTransition {
            from: VisitStatus::Completed,
            to: VisitStatus::Cancelled,
        }
        .into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "INVALID_STATUS_TRANSITION");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err: ApiError = DomainError::VisitNotFound.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_past_date_maps_to_validation_error() {
        let err: ApiError =
            DomainError::PlannedDateInPast(chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
                .into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_database_error_is_opaque_500() {
        let err: ApiError = DomainError::DatabaseError("connection refused".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_duplicate_sku_maps_to_conflict_code() {
        let err: ApiError = DomainError::SkuAlreadyExists("SKU-1".to_string()).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "SKU_EXISTS");
    }

    #[test]
    fn test_wrong_password_is_unauthorized_not_500() {
        let err: ApiError = DomainError::InvalidCredentials.into();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.code(), "INVALID_CREDENTIALS");
    }
}
