//! No-op implementation of AuditLogRepository for when audit logging is not needed

use async_trait::async_trait;

use super::AuditLogRepository;
use crate::domain::entities::{AccountId, AuditRecord};
use crate::errors::DomainError;

/// Discards every record
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpAuditLogRepository;

impl NoOpAuditLogRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditLogRepository for NoOpAuditLogRepository {
    async fn create(&self, _record: &AuditRecord) -> Result<(), DomainError> {
        Ok(())
    }

    async fn find_by_actor(
        &self,
        _actor_id: &AccountId,
        _limit: usize,
    ) -> Result<Vec<AuditRecord>, DomainError> {
        Ok(Vec::new())
    }
}
