//! Token service module for session JWTs
//!
//! HS256 tokens keyed by the process signing secret. The role claim is
//! informational; authorization re-reads the caller's current role.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use service::{IssuedToken, TokenService};
