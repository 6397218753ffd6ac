//! Customer repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use fieldops_shared::types::Pagination;

use crate::domain::Customer;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_by_id(
        &self,
        tenant_id: &Uuid,
        customer_id: &Uuid,
    ) -> Result<Option<Customer>, DomainError>;
    async fn list(
        &self,
        tenant_id: &Uuid,
        pagination: Pagination,
    ) -> Result<Vec<Customer>, DomainError>;
    async fn create(&self, customer: &Customer) -> Result<Customer, DomainError>;
    async fn update(&self, customer: &Customer) -> Result<Customer, DomainError>;
    async fn soft_delete(
        &self,
        tenant_id: &Uuid,
        customer_id: &Uuid,
        removed_by: &Uuid,
    ) -> Result<(), DomainError>;
}
