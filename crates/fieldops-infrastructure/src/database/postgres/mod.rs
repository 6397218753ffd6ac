//! PostgreSQL repository implementations

pub mod brand_repo_impl;
pub mod customer_repo_impl;
pub mod export_repo_impl;
pub mod order_repo_impl;
pub mod product_repo_impl;
pub mod tenant_repo_impl;
pub mod tier_repo_impl;
pub mod user_repo_impl;
pub mod visit_repo_impl;

pub use brand_repo_impl::PgBrandRepository;
pub use customer_repo_impl::PgCustomerRepository;
pub use export_repo_impl::PgExportRepository;
pub use order_repo_impl::PgOrderRepository;
pub use product_repo_impl::PgProductRepository;
pub use tenant_repo_impl::PgTenantRepository;
pub use tier_repo_impl::PgTierRepository;
pub use user_repo_impl::PgUserRepository;
pub use visit_repo_impl::PgVisitRepository;
