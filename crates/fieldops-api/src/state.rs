//! Shared application state (dependency wiring)

use std::sync::Arc;

use sqlx::PgPool;

use fieldops_core::services::{AuthService, TenantService, UserService, VisitService};
use fieldops_infrastructure::{
    PgBrandRepository, PgCustomerRepository, PgExportRepository, PgOrderRepository,
    PgProductRepository, PgTenantRepository, PgTierRepository, PgUserRepository,
    PgVisitRepository,
};
use fieldops_security::JwtService;
use fieldops_shared::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: AppConfig,
    pub jwt: Arc<JwtService>,

    pub auth_service: Arc<AuthService<PgUserRepository>>,
    pub tenant_service: Arc<TenantService<PgTenantRepository>>,
    pub user_service: Arc<UserService<PgUserRepository>>,
    pub visit_service: Arc<VisitService<PgVisitRepository>>,

    pub user_repo: Arc<PgUserRepository>,
    pub customer_repo: Arc<PgCustomerRepository>,
    pub brand_repo: Arc<PgBrandRepository>,
    pub tier_repo: Arc<PgTierRepository>,
    pub product_repo: Arc<PgProductRepository>,
    pub order_repo: Arc<PgOrderRepository>,
    pub export_repo: Arc<PgExportRepository>,
}

impl AppState {
    /// Wires repositories and services around one connection pool.
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let jwt = Arc::new(JwtService::new(
            config.jwt.secret.clone(),
            config.jwt.access_token_expiry,
            config.jwt.refresh_token_expiry,
        ));

        let user_repo = Arc::new(PgUserRepository::new(db.clone()));
        let tenant_repo = Arc::new(PgTenantRepository::new(db.clone()));
        let visit_repo = Arc::new(PgVisitRepository::new(db.clone()));

        Self {
            auth_service: Arc::new(AuthService::new(user_repo.clone(), JwtService::new(
                config.jwt.secret.clone(),
                config.jwt.access_token_expiry,
                config.jwt.refresh_token_expiry,
            ))),
            tenant_service: Arc::new(TenantService::new(tenant_repo)),
            user_service: Arc::new(UserService::new(user_repo.clone())),
            visit_service: Arc::new(VisitService::new(visit_repo)),
            user_repo,
            customer_repo: Arc::new(PgCustomerRepository::new(db.clone())),
            brand_repo: Arc::new(PgBrandRepository::new(db.clone())),
            tier_repo: Arc::new(PgTierRepository::new(db.clone())),
            product_repo: Arc::new(PgProductRepository::new(db.clone())),
            order_repo: Arc::new(PgOrderRepository::new(db.clone())),
            export_repo: Arc::new(PgExportRepository::new(db.clone())),
            jwt,
            db,
            config,
        }
    }
}
