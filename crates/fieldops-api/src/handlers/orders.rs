//! Order CRUD. Order status is a plain flag set by staff; only visits
//! carry a guarded transition table.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use fieldops_core::domain::actor::Actor;
use fieldops_core::domain::order::OrderStatus;
use fieldops_core::domain::user::Role;
use fieldops_core::domain::Order;
use fieldops_core::error::DomainError;
use fieldops_core::repositories::OrderRepository;
use fieldops_shared::utils::sanitize_opt;

use super::{staff_scope, write_scope};
use crate::dto::PageQuery;
use crate::error::{validate_payload, ApiError};
use crate::response::ApiResponse;
use crate::state::AppState;

const WRITE_ROLES: &[Role] = &[Role::Admin, Role::Supervisor, Role::SalesRep];

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    pub visit_id: Option<Uuid>,

    #[validate(range(min = 0, message = "Total cannot be negative"))]
    pub total_cents: i64,

    #[validate(length(max = 4000, message = "Notes too long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrderRequest {
    pub status: Option<String>,

    #[validate(range(min = 0, message = "Total cannot be negative"))]
    pub total_cents: Option<i64>,

    #[validate(length(max = 4000, message = "Notes too long"))]
    pub notes: Option<String>,
}

/// `customer_id` narrows order listings to one customer.
#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub customer_id: Option<Uuid>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl OrderListQuery {
    fn page(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// POST /api/v1/orders
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
    let tenant_id = write_scope(&actor, WRITE_ROLES)?;
    validate_payload(&payload)?;

    let order = Order::new(
        tenant_id,
        payload.customer_id,
        payload.visit_id,
        payload.total_cents,
        sanitize_opt(payload.notes.as_deref()),
        Some(actor.user_id),
    )
    .map_err(|e| DomainError::ValidationError(e.to_string()))?;

    let created = state.order_repo.create(&order).await?;
    Ok(Json(ApiResponse::success(created)))
}

/// GET /api/v1/orders
pub async fn list(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<ApiResponse<Vec<Order>>>, ApiError> {
    let tenant_id = staff_scope(&actor)?;
    let orders = state
        .order_repo
        .list(
            &tenant_id,
            query.customer_id.as_ref(),
            query.page().pagination(),
        )
        .await?;
    Ok(Json(ApiResponse::success(orders)))
}

/// GET /api/v1/orders/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
    let tenant_id = staff_scope(&actor)?;
    let order = state
        .order_repo
        .find_by_id(&tenant_id, &id)
        .await?
        .ok_or(DomainError::OrderNotFound)?;
    Ok(Json(ApiResponse::success(order)))
}

/// PATCH /api/v1/orders/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderRequest>,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
    let tenant_id = write_scope(&actor, WRITE_ROLES)?;
    validate_payload(&payload)?;

    let mut order = state
        .order_repo
        .find_by_id(&tenant_id, &id)
        .await?
        .ok_or(DomainError::OrderNotFound)?;

    if let Some(status) = payload.status {
        order.status = OrderStatus::from_str(&status)
            .ok_or_else(|| ApiError::validation(format!("Unknown order status: {status}")))?;
    }
    if let Some(total) = payload.total_cents {
        order.total_cents = total;
    }
    if let Some(notes) = payload.notes {
        order.notes = sanitize_opt(Some(&notes));
    }
    order.modified_at = Some(Utc::now());
    order.modified_by = Some(actor.user_id);

    let updated = state.order_repo.update(&order).await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// DELETE /api/v1/orders/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let tenant_id = write_scope(&actor, WRITE_ROLES)?;
    state
        .order_repo
        .soft_delete(&tenant_id, &id, &actor.user_id)
        .await?;
    Ok(Json(ApiResponse::success(())))
}
