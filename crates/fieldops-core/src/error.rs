//! Domain errors

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::visit::VisitStatus;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found")]
    UserNotFound,

    #[error("User not active")]
    UserNotActive,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Tenant not found")]
    TenantNotFound,

    #[error("Tenant name already exists: {0}")]
    TenantNameAlreadyExists(String),

    #[error("Tenant slug already exists: {0}")]
    TenantSlugAlreadyExists(String),

    #[error("Tenant not active")]
    TenantNotActive,

    #[error("Customer not found")]
    CustomerNotFound,

    #[error("Brand not found")]
    BrandNotFound,

    #[error("Brand name already exists: {0}")]
    BrandNameAlreadyExists(String),

    #[error("Tier not found")]
    TierNotFound,

    #[error("Tier name already exists: {0}")]
    TierNameAlreadyExists(String),

    #[error("Product not found")]
    ProductNotFound,

    #[error("Product SKU already exists: {0}")]
    SkuAlreadyExists(String),

    #[error("Order not found")]
    OrderNotFound,

    #[error("Export not found")]
    ExportNotFound,

    #[error("Visit not found")]
    VisitNotFound,

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition { from: VisitStatus, to: VisitStatus },

    #[error("Visit can only be edited while planned, current status: {0}")]
    VisitNotEditable(VisitStatus),

    #[error("Planned date is in the past: {0}")]
    PlannedDateInPast(NaiveDate),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}
