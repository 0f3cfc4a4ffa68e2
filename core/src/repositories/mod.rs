//! Repository ports and their in-process implementations.

pub mod audit;
pub mod identity;

pub use crate::errors::ProviderError;
pub use audit::{
    AuditLogRepository, InMemoryAuditLogRepository, NoOpAuditLogRepository,
    TracingAuditLogRepository,
};
pub use identity::{IdentityProvider, InMemoryIdentityProvider};
