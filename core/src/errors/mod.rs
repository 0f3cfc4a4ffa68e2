//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::ProviderError;

use cg_shared::error_codes;
use thiserror::Error;
use uuid::Uuid;

/// Core domain errors returned to the caller-facing layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Not permitted to perform this operation")]
    Forbidden,

    #[error("Account not found")]
    NotFound,

    #[error("An account with this email already exists")]
    Conflict,

    /// Only the correlation id leaves the process; the provider detail is logged
    #[error("Identity provider request failed (correlation id {correlation_id})")]
    Upstream { correlation_id: Uuid },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Stable error code shared with the HTTP error body
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => error_codes::VALIDATION_ERROR,
            DomainError::Unauthenticated => error_codes::UNAUTHENTICATED,
            DomainError::Forbidden => error_codes::FORBIDDEN,
            DomainError::NotFound => error_codes::NOT_FOUND,
            DomainError::Conflict => error_codes::CONFLICT,
            DomainError::Upstream { .. } => error_codes::UPSTREAM_ERROR,
            DomainError::Internal { .. } => error_codes::INTERNAL_ERROR,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
