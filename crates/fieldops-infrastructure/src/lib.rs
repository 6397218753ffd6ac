//! # FieldOps Infrastructure
//!
//! PostgreSQL implementations of the repository ports (adapters).

pub mod database;

pub use database::{
    create_pool, run_migrations, PgBrandRepository, PgCustomerRepository, PgExportRepository,
    PgOrderRepository, PgProductRepository, PgTenantRepository, PgTierRepository,
    PgUserRepository, PgVisitRepository,
};
