//! Product catalog CRUD, tenant scoped

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
use fieldops_core::domain::Product;
use fieldops_core::error::DomainError;
use fieldops_core::repositories::ProductRepository;
use fieldops_shared::utils::sanitize_opt;

use super::{staff_scope, write_scope};
use crate::dto::PageQuery;
use crate::error::{validate_payload, ApiError};
use crate::response::ApiResponse;
use crate::state::AppState;

const WRITE_ROLES: &[Role] = &[Role::Admin];

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    pub brand_id: Option<Uuid>,

    #[validate(length(min = 1, max = 64, message = "SKU must be 1-64 characters"))]
    pub sku: String,

    #[validate(length(min = 2, max = 160, message = "Name must be 2-160 characters"))]
    pub name: String,

    pub description: Option<String>,

    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub unit_price_cents: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    pub brand_id: Option<Uuid>,

    #[validate(length(min = 2, max = 160, message = "Name must be 2-160 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub unit_price_cents: Option<i64>,

    pub is_active: Option<bool>,
}

/// `brand_id` narrows product listings to one brand.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub brand_id: Option<Uuid>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ProductListQuery {
    fn page(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// POST /api/v1/products
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let tenant_id = write_scope(&actor, WRITE_ROLES)?;
    validate_payload(&payload)?;

    let product = Product::new(
        tenant_id,
        payload.brand_id,
        payload.sku,
        payload.name,
        sanitize_opt(payload.description.as_deref()),
        payload.unit_price_cents,
        Some(actor.user_id),
    )
    .map_err(|e| DomainError::ValidationError(e.to_string()))?;

    let created = state.product_repo.create(&product).await?;
    Ok(Json(ApiResponse::success(created)))
}

/// GET /api/v1/products
pub async fn list(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let tenant_id = staff_scope(&actor)?;
    let products = state
        .product_repo
        .list(&tenant_id, query.brand_id.as_ref(), query.page().pagination())
        .await?;
    Ok(Json(ApiResponse::success(products)))
}

/// GET /api/v1/products/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let tenant_id = staff_scope(&actor)?;
    let product = state
        .product_repo
        .find_by_id(&tenant_id, &id)
        .await?
        .ok_or(DomainError::ProductNotFound)?;
    Ok(Json(ApiResponse::success(product)))
}

/// PATCH /api/v1/products/{id}
///
/// The SKU is fixed after creation; it keys uniqueness inside the tenant.
pub async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let tenant_id = write_scope(&actor, WRITE_ROLES)?;
    validate_payload(&payload)?;

    let mut product = state
        .product_repo
        .find_by_id(&tenant_id, &id)
        .await?
        .ok_or(DomainError::ProductNotFound)?;

    if payload.brand_id.is_some() {
        product.brand_id = payload.brand_id;
    }
    if let Some(name) = payload.name {
        product.name = name;
    }
    if let Some(description) = payload.description {
        product.description = sanitize_opt(Some(&description));
    }
    if let Some(price) = payload.unit_price_cents {
        product.unit_price_cents = price;
    }
    if let Some(is_active) = payload.is_active {
        product.is_active = is_active;
    }
    product.modified_at = Some(Utc::now());
    product.modified_by = Some(actor.user_id);

    let updated = state.product_repo.update(&product).await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// DELETE /api/v1/products/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let tenant_id = write_scope(&actor, WRITE_ROLES)?;
    state
        .product_repo
        .soft_delete(&tenant_id, &id, &actor.user_id)
        .await?;
    Ok(Json(ApiResponse::success(())))
}
