//! Brand repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use fieldops_shared::types::Pagination;

use crate::domain::Brand;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrandRepository: Send + Sync {
    async fn find_by_id(
        &self,
        tenant_id: &Uuid,
        brand_id: &Uuid,
    ) -> Result<Option<Brand>, DomainError>;
    async fn find_by_name(&self, tenant_id: &Uuid, name: &str)
        -> Result<Option<Brand>, DomainError>;
    async fn list(
        &self,
        tenant_id: &Uuid,
        pagination: Pagination,
    ) -> Result<Vec<Brand>, DomainError>;
    async fn create(&self, brand: &Brand) -> Result<Brand, DomainError>;
    async fn update(&self, brand: &Brand) -> Result<Brand, DomainError>;
    async fn soft_delete(
        &self,
        tenant_id: &Uuid,
        brand_id: &Uuid,
        removed_by: &Uuid,
    ) -> Result<(), DomainError>;
}
