//! Order repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use fieldops_shared::types::Pagination;

use crate::domain::Order;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(
        &self,
        tenant_id: &Uuid,
        order_id: &Uuid,
    ) -> Result<Option<Order>, DomainError>;
    async fn list<'a>(
        &self,
        tenant_id: &Uuid,
        customer_id: Option<&'a Uuid>,
        pagination: Pagination,
    ) -> Result<Vec<Order>, DomainError>;
    async fn create(&self, order: &Order) -> Result<Order, DomainError>;
    async fn update(&self, order: &Order) -> Result<Order, DomainError>;
    async fn soft_delete(
        &self,
        tenant_id: &Uuid,
        order_id: &Uuid,
        removed_by: &Uuid,
    ) -> Result<(), DomainError>;
}
