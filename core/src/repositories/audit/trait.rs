//! Audit log repository trait defining the interface for audit record persistence.

use async_trait::async_trait;

use crate::domain::entities::{AccountId, AuditRecord};
use crate::errors::DomainError;

/// Repository trait for audit record persistence
///
/// Writes happen after the privileged operation has completed, so an
/// implementation failing here never changes the operation's result.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Persist a new audit record
    async fn create(&self, record: &AuditRecord) -> Result<(), DomainError>;

    /// Most recent records written by `actor_id`, newest first
    async fn find_by_actor(
        &self,
        actor_id: &AccountId,
        limit: usize,
    ) -> Result<Vec<AuditRecord>, DomainError>;
}
