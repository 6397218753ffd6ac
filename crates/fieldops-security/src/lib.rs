//! # Fieldops Security
//!
//! Security utilities: JWT issuing/validation and password hashing.

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtService};
pub use password::PasswordService;
