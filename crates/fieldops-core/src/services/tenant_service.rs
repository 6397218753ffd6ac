// ============================================================================
// FieldOps Core - Tenant Service
// File: crates/fieldops-core/src/services/tenant_service.rs
// ============================================================================
//! Tenant administration, restricted to platform super admins

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use fieldops_shared::types::Pagination;

use crate::domain::actor::Actor;
use crate::domain::user::Role;
use crate::domain::Tenant;
use crate::error::DomainError;
use crate::repositories::TenantRepository;

/// Input for onboarding a new tenant.
#[derive(Debug, Clone)]
pub struct NewTenant {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

/// Partial update of a tenant. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct TenantChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

pub struct TenantService<R: TenantRepository> {
    tenant_repo: Arc<R>,
}

impl<R: TenantRepository> TenantService<R> {
    pub fn new(tenant_repo: Arc<R>) -> Self {
        Self { tenant_repo }
    }

    pub async fn create_tenant(
        &self,
        actor: &Actor,
        input: NewTenant,
    ) -> Result<Tenant, DomainError> {
        self.ensure_super_admin(actor)?;
        ensure_valid_slug(&input.slug)?;

        // Slug and name are unique across the platform
        if self.tenant_repo.find_by_slug(&input.slug).await?.is_some() {
            warn!("Tenant creation failed: slug taken: {}", input.slug);
            return Err(DomainError::TenantSlugAlreadyExists(input.slug));
        }
        if self.tenant_repo.find_by_name(&input.name).await?.is_some() {
            warn!("Tenant creation failed: name taken: {}", input.name);
            return Err(DomainError::TenantNameAlreadyExists(input.name));
        }

        let tenant = Tenant::new(
            input.name,
            input.slug,
            input.description,
            Some(actor.user_id),
        )
        .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        let created = self.tenant_repo.create(&tenant).await?;
        info!("Tenant {} ({}) onboarded", created.id, created.slug);
        Ok(created)
    }

    pub async fn update_tenant(
        &self,
        actor: &Actor,
        tenant_id: &Uuid,
        changes: TenantChanges,
    ) -> Result<Tenant, DomainError> {
        self.ensure_super_admin(actor)?;

        let mut tenant = self
            .tenant_repo
            .find_by_id(tenant_id)
            .await?
            .ok_or(DomainError::TenantNotFound)?;

        if let Some(name) = changes.name {
            if name != tenant.name && self.tenant_repo.find_by_name(&name).await?.is_some() {
                return Err(DomainError::TenantNameAlreadyExists(name));
            }
            tenant.name = name;
        }
        if let Some(description) = changes.description {
            tenant.description = Some(description);
        }
        if let Some(is_active) = changes.is_active {
            tenant.is_active = is_active;
        }
        tenant.modified_at = Some(Utc::now());
        tenant.modified_by = Some(actor.user_id);

        self.tenant_repo.update(&tenant).await
    }

    pub async fn get_tenant(&self, actor: &Actor, tenant_id: &Uuid) -> Result<Tenant, DomainError> {
        self.ensure_super_admin(actor)?;
        self.tenant_repo
            .find_by_id(tenant_id)
            .await?
            .ok_or(DomainError::TenantNotFound)
    }

    pub async fn list_tenants(
        &self,
        actor: &Actor,
        pagination: Pagination,
    ) -> Result<Vec<Tenant>, DomainError> {
        self.ensure_super_admin(actor)?;
        self.tenant_repo.list(pagination.clamped()).await
    }

    pub async fn deactivate_tenant(
        &self,
        actor: &Actor,
        tenant_id: &Uuid,
    ) -> Result<Tenant, DomainError> {
        self.ensure_super_admin(actor)?;

        let mut tenant = self
            .tenant_repo
            .find_by_id(tenant_id)
            .await?
            .ok_or(DomainError::TenantNotFound)?;
        tenant.deactivate(actor.user_id);

        let updated = self.tenant_repo.update(&tenant).await?;
        info!("Tenant {} deactivated by {}", updated.id, actor.user_id);
        Ok(updated)
    }

    fn ensure_super_admin(&self, actor: &Actor) -> Result<(), DomainError> {
        if actor.role == Role::SuperAdmin {
            Ok(())
        } else {
            warn!(
                "User {} with role {} denied tenant administration",
                actor.user_id, actor.role
            );
            Err(DomainError::Forbidden(
                "Tenant administration requires a platform admin".to_string(),
            ))
        }
    }
}

/// Slugs are lowercase ASCII letters, digits and inner hyphens.
fn ensure_valid_slug(slug: &str) -> Result<(), DomainError> {
    let valid = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(DomainError::ValidationError(format!(
            "Invalid tenant slug: {slug}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::tenant_repository::MockTenantRepository;

    fn super_admin() -> Actor {
        Actor {
            user_id: Uuid::new_v4(),
            tenant_id: None,
            role: Role::SuperAdmin,
        }
    }

    fn new_tenant() -> NewTenant {
        NewTenant {
            name: "Acme Distribution".to_string(),
            slug: "acme-distribution".to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_tenant_happy_path() {
        let mut repo = MockTenantRepository::new();
        repo.expect_find_by_slug().returning(|_| Ok(None));
        repo.expect_find_by_name().returning(|_| Ok(None));
        repo.expect_create().returning(|t| Ok(t.clone()));

        let service = TenantService::new(Arc::new(repo));
        let created = service
            .create_tenant(&super_admin(), new_tenant())
            .await
            .unwrap();
        assert_eq!(created.slug, "acme-distribution");
        assert!(created.is_active);
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_rejected() {
        let mut repo = MockTenantRepository::new();
        repo.expect_find_by_slug().returning(|slug| {
            Ok(Some(
                Tenant::new("Other".to_string(), slug.to_string(), None, None).unwrap(),
            ))
        });

        let service = TenantService::new(Arc::new(repo));
        let err = service
            .create_tenant(&super_admin(), new_tenant())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::TenantSlugAlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_tenant_admin_cannot_create_tenants() {
        let admin = Actor {
            user_id: Uuid::new_v4(),
            tenant_id: Some(Uuid::new_v4()),
            role: Role::Admin,
        };

        let repo = MockTenantRepository::new();
        let service = TenantService::new(Arc::new(repo));
        let err = service
            .create_tenant(&admin, new_tenant())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_bad_slug_is_rejected() {
        let repo = MockTenantRepository::new();
        let service = TenantService::new(Arc::new(repo));

        for slug in ["Acme", "acme distribution", "-acme", "acme-"] {
            let err = service
                .create_tenant(
                    &super_admin(),
                    NewTenant {
                        name: "Acme".to_string(),
                        slug: slug.to_string(),
                        description: None,
                    },
                )
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::ValidationError(_)), "{slug}");
        }
    }

    #[tokio::test]
    async fn test_deactivate_tenant() {
        let tenant = Tenant::new(
            "Acme".to_string(),
            "acme".to_string(),
            None,
            None,
        )
        .unwrap();
        let tenant_id = tenant.id;

        let mut repo = MockTenantRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(tenant.clone())));
        repo.expect_update()
            .withf(|t| !t.is_active && t.modified_by.is_some())
            .returning(|t| Ok(t.clone()));

        let service = TenantService::new(Arc::new(repo));
        let updated = service
            .deactivate_tenant(&super_admin(), &tenant_id)
            .await
            .unwrap();
        assert!(!updated.is_active);
    }
}
