//! # FieldOps Core - Domain Module
//!
//! Domain entities for the field operations platform.

pub mod actor;
pub mod brand;
pub mod customer;
pub mod export;
pub mod order;
pub mod product;
pub mod tenant;
pub mod tier;
pub mod user;
pub mod visit;

// Re-export all entities and enums
pub use actor::Actor;
pub use brand::Brand;
pub use customer::Customer;
pub use export::{ExportFormat, ExportRequest, ExportResource, ExportStatus};
pub use order::{Order, OrderStatus};
pub use product::Product;
pub use tenant::Tenant;
pub use tier::Tier;
pub use user::{Role, User};
pub use visit::{GeoPoint, Visit, VisitStatus, VisitStatusEvent};
