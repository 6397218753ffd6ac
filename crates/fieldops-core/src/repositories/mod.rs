//! Repository traits (ports)

pub mod brand_repository;
pub mod customer_repository;
pub mod export_repository;
pub mod order_repository;
pub mod product_repository;
pub mod tenant_repository;
pub mod tier_repository;
pub mod user_repository;
pub mod visit_repository;

pub use brand_repository::BrandRepository;
pub use customer_repository::CustomerRepository;
pub use export_repository::ExportRepository;
pub use order_repository::OrderRepository;
pub use product_repository::ProductRepository;
pub use tenant_repository::TenantRepository;
pub use tier_repository::TierRepository;
pub use user_repository::UserRepository;
pub use visit_repository::{VisitChanges, VisitFilter, VisitRepository, VisitTransition};
