//! HTTP handlers, one module per resource

pub mod auth;
pub mod brands;
pub mod customers;
pub mod exports;
pub mod health;
pub mod orders;
pub mod products;
pub mod tenants;
pub mod tiers;
pub mod users;
pub mod visits;

use fieldops_core::domain::actor::Actor;
use fieldops_core::domain::user::Role;
use uuid::Uuid;

use crate::error::ApiError;

/// Staff read access within the actor's tenant.
pub(crate) fn staff_scope(actor: &Actor) -> Result<Uuid, ApiError> {
    if !actor.role.is_staff() {
        return Err(ApiError::Forbidden(
            "FORBIDDEN",
            "Staff role required".to_string(),
        ));
    }
    actor.tenant_scope().map_err(ApiError::from)
}

/// Tenant-scoped write access restricted to the given roles.
pub(crate) fn write_scope(actor: &Actor, allowed: &[Role]) -> Result<Uuid, ApiError> {
    if !allowed.contains(&actor.role) {
        return Err(ApiError::Forbidden(
            "FORBIDDEN",
            "Insufficient role for this operation".to_string(),
        ));
    }
    actor.tenant_scope().map_err(ApiError::from)
}
