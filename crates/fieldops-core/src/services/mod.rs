//! Domain services (business logic)

pub mod auth_service;
pub mod tenant_service;
pub mod user_service;
pub mod visit_service;

pub use auth_service::{AuthService, LoginResult, UserInfo};
pub use tenant_service::{NewTenant, TenantChanges, TenantService};
pub use user_service::{NewUser, UserChanges, UserService};
pub use visit_service::{NewVisit, VisitService};
