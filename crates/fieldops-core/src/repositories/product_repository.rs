//! Product repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use fieldops_shared::types::Pagination;

use crate::domain::Product;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(
        &self,
        tenant_id: &Uuid,
        product_id: &Uuid,
    ) -> Result<Option<Product>, DomainError>;
    async fn find_by_sku(&self, tenant_id: &Uuid, sku: &str)
        -> Result<Option<Product>, DomainError>;
    async fn list<'a>(
        &self,
        tenant_id: &Uuid,
        brand_id: Option<&'a Uuid>,
        pagination: Pagination,
    ) -> Result<Vec<Product>, DomainError>;
    async fn create(&self, product: &Product) -> Result<Product, DomainError>;
    async fn update(&self, product: &Product) -> Result<Product, DomainError>;
    async fn soft_delete(
        &self,
        tenant_id: &Uuid,
        product_id: &Uuid,
        removed_by: &Uuid,
    ) -> Result<(), DomainError>;
}
