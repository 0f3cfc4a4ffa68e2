//! AuditLogRepository that writes each record as a `tracing` event.

use async_trait::async_trait;
use tracing::info;

use super::AuditLogRepository;
use crate::domain::entities::{AccountId, AuditOutcome, AuditRecord};
use crate::errors::DomainError;

/// Event target, so audit lines can be filtered or routed on their own
pub const AUDIT_TARGET: &str = "audit";

/// Emits every record under the `audit` target
///
/// Records go wherever the subscriber sends them; nothing is kept in
/// process, so `find_by_actor` is always empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditLogRepository;

impl TracingAuditLogRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditLogRepository for TracingAuditLogRepository {
    async fn create(&self, record: &AuditRecord) -> Result<(), DomainError> {
        let (outcome, error_kind) = match &record.outcome {
            AuditOutcome::Success => ("success", None),
            AuditOutcome::Failure { error_kind } => ("failure", Some(error_kind.as_str())),
        };
        info!(
            target: AUDIT_TARGET,
            record_id = %record.id,
            actor_id = %record.actor_id,
            operation = %record.operation,
            target_id = record.target_id.as_ref().map(AccountId::as_str),
            outcome,
            error_kind,
            created_at = %record.created_at.to_rfc3339(),
            "Audit record"
        );
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
