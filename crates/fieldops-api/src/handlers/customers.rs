// ============================================================================
// FieldOps API - Customer Handlers
// File: crates/fieldops-api/src/handlers/customers.rs
// ============================================================================
//! Customer (outlet) CRUD, tenant scoped

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
use fieldops_core::domain::Customer;
use fieldops_core::error::DomainError;
use fieldops_core::repositories::CustomerRepository;
use fieldops_shared::utils::sanitize_opt;

use super::{staff_scope, write_scope};
use crate::dto::PageQuery;
use crate::error::{validate_payload, ApiError};
use crate::response::ApiResponse;
use crate::state::AppState;

const WRITE_ROLES: &[Role] = &[Role::Admin, Role::Supervisor];

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 2, max = 160, message = "Name must be 2-160 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub tier_id: Option<Uuid>,
    pub assigned_rep_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 2, max = 160, message = "Name must be 2-160 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub tier_id: Option<Uuid>,
    pub assigned_rep_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

/// POST /api/v1/customers
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<Json<ApiResponse<Customer>>, ApiError> {
    let tenant_id = write_scope(&actor, WRITE_ROLES)?;
    validate_payload(&payload)?;

    let customer = Customer::new(
        tenant_id,
        payload.name,
        payload.email,
        sanitize_opt(payload.phone.as_deref()),
        sanitize_opt(payload.address.as_deref()),
        sanitize_opt(payload.city.as_deref()),
        payload.tier_id,
        payload.assigned_rep_id,
        Some(actor.user_id),
    )
    .map_err(|e| DomainError::ValidationError(e.to_string()))?;

    let created = state.customer_repo.create(&customer).await?;
    Ok(Json(ApiResponse::success(created)))
}

/// GET /api/v1/customers
pub async fn list(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Customer>>>, ApiError> {
    let tenant_id = staff_scope(&actor)?;
    let customers = state
        .customer_repo
        .list(&tenant_id, page.pagination())
        .await?;
    Ok(Json(ApiResponse::success(customers)))
}

/// GET /api/v1/customers/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Customer>>, ApiError> {
    let tenant_id = staff_scope(&actor)?;
    let customer = state
        .customer_repo
        .find_by_id(&tenant_id, &id)
        .await?
        .ok_or(DomainError::CustomerNotFound)?;
    Ok(Json(ApiResponse::success(customer)))
}

/// PATCH /api/v1/customers/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> Result<Json<ApiResponse<Customer>>, ApiError> {
    let tenant_id = write_scope(&actor, WRITE_ROLES)?;
    validate_payload(&payload)?;

    let mut customer = state
        .customer_repo
        .find_by_id(&tenant_id, &id)
        .await?
        .ok_or(DomainError::CustomerNotFound)?;

    if let Some(name) = payload.name {
        customer.name = name;
    }
    if let Some(email) = payload.email {
        customer.email = Some(email);
    }
    if let Some(phone) = payload.phone {
        customer.phone = sanitize_opt(Some(&phone));
    }
    if let Some(address) = payload.address {
        customer.address = sanitize_opt(Some(&address));
    }
    if let Some(city) = payload.city {
        customer.city = sanitize_opt(Some(&city));
    }
    if payload.tier_id.is_some() {
        customer.tier_id = payload.tier_id;
    }
    if payload.assigned_rep_id.is_some() {
        customer.assigned_rep_id = payload.assigned_rep_id;
    }
    if let Some(is_active) = payload.is_active {
        customer.is_active = is_active;
    }
    customer.modified_at = Some(Utc::now());
    customer.modified_by = Some(actor.user_id);

    let updated = state.customer_repo.update(&customer).await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// DELETE /api/v1/customers/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let tenant_id = write_scope(&actor, WRITE_ROLES)?;
    state
        .customer_repo
        .soft_delete(&tenant_id, &id, &actor.user_id)
        .await?;
    Ok(Json(ApiResponse::success(())))
}
