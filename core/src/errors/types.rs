//! Failures reported by an identity provider adapter

use thiserror::Error;

/// Adapter-level failure; translated to a `DomainError` by the gateway
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("account already exists")]
    Conflict,

    #[error("provider denied the elevated credential")]
    Forbidden,

    #[error("account not found")]
    NotFound,

    #[error("provider request timed out")]
    Timeout,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("unexpected provider response (status {status}): {body}")]
    Unexpected { status: u16, body: String },

    #[error("malformed provider response: {0}")]
    Decode(String),
}
