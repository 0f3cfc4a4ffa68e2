//! Shared utilities and common types for the Clinic Gate server
//!
//! This crate provides common functionality used across all server modules:
//! - Process configuration and its startup validation
//! - Error response structures
//! - Field validation helpers

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{ConfigError, Environment, LogLevel, ProcessConfig};
pub use errors::{error_codes, ErrorResponse};
pub use utils::validation::{self, FieldViolation, Violations};
