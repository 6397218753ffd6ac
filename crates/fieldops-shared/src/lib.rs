//! # Fieldops Shared
//!
//! Shared utilities, types, configuration, and telemetry for the fieldops
//! platform.

pub mod config;
pub mod constants;
pub mod telemetry;
pub mod types;
pub mod utils;

pub use types::*;
