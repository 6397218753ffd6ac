//! Tier repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Tier;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TierRepository: Send + Sync {
    async fn find_by_id(&self, tenant_id: &Uuid, tier_id: &Uuid)
        -> Result<Option<Tier>, DomainError>;
    async fn find_by_name(&self, tenant_id: &Uuid, name: &str)
        -> Result<Option<Tier>, DomainError>;
    /// Tiers are a small fixed set per tenant, returned ordered by rank.
    async fn list(&self, tenant_id: &Uuid) -> Result<Vec<Tier>, DomainError>;
    async fn create(&self, tier: &Tier) -> Result<Tier, DomainError>;
    async fn update(&self, tier: &Tier) -> Result<Tier, DomainError>;
    async fn soft_delete(
        &self,
        tenant_id: &Uuid,
        tier_id: &Uuid,
        removed_by: &Uuid,
    ) -> Result<(), DomainError>;
}
