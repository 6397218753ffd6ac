//! Export repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use fieldops_shared::types::Pagination;

use crate::domain::ExportRequest;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExportRepository: Send + Sync {
    async fn find_by_id(
        &self,
        tenant_id: &Uuid,
        export_id: &Uuid,
    ) -> Result<Option<ExportRequest>, DomainError>;
    async fn list(
        &self,
        tenant_id: &Uuid,
        pagination: Pagination,
    ) -> Result<Vec<ExportRequest>, DomainError>;
    async fn create(&self, export: &ExportRequest) -> Result<ExportRequest, DomainError>;
    async fn update(&self, export: &ExportRequest) -> Result<ExportRequest, DomainError>;
}
