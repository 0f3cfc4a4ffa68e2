//! # Infrastructure Layer
//!
//! Concrete adapters for the Clinic Gate backend. The only external system
//! is the identity provider, reached over its admin users API and two
//! database RPCs with the elevated credential.
//!
//! ## Architecture
//!
//! - **Identity**: [`HttpIdentityProvider`], a reqwest implementation of
//!   [`cg_core::IdentityProvider`]

/// Identity provider adapter
pub mod identity;

pub use identity::HttpIdentityProvider;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
