//! Audit service recording the outcome of privileged operations.
//!
//! Writes never fail the audited operation: a repository error is logged
//! and dropped.

use std::sync::Arc;
use tokio::task;
use tracing::warn;

use crate::domain::entities::{AccountId, AuditOutcome, AuditRecord, Caller, Operation};
use crate::errors::DomainError;
use crate::repositories::AuditLogRepository;

/// Configuration for the audit service
#[derive(Debug, Clone)]
pub struct AuditServiceConfig {
    /// Whether to run audit writes in a background task
    pub async_writes: bool,
}

impl Default for AuditServiceConfig {
    fn default() -> Self {
        Self { async_writes: true }
    }
}

/// Service for writing audit records
pub struct AuditService<R>
where
    R: AuditLogRepository,
{
    repository: Arc<R>,
    config: AuditServiceConfig,
}

impl<R> AuditService<R>
where
    R: AuditLogRepository + 'static,
{
    /// Create a new audit service
    pub fn new(repository: Arc<R>, config: AuditServiceConfig) -> Self {
        Self { repository, config }
    }

    /// Record the outcome of `operation` performed by `caller`
    pub async fn record_outcome<T>(
        &self,
        caller: &Caller,
        operation: Operation,
        target: Option<&AccountId>,
        result: &Result<T, DomainError>,
    ) {
        let outcome = match result {
            Ok(_) => AuditOutcome::Success,
            Err(e) => AuditOutcome::Failure {
                error_kind: e.code().to_string(),
            },
        };

        let mut record = AuditRecord::new(caller.id.clone(), operation, outcome);
        if let Some(target) = target {
            record = record.with_target(target.clone());
        }
        self.write_record(record).await;
    }

    /// Write a record to the repository
    ///
    /// If async_writes is enabled, the write happens in a background task.
    async fn write_record(&self, record: AuditRecord) {
        if self.config.async_writes {
            let repository = Arc::clone(&self.repository);
            task::spawn(async move {
                if let Err(e) = repository.create(&record).await {
                    warn!(error = %e, record_id = %record.id, "Failed to write audit record");
                }
            });
        } else if let Err(e) = self.repository.create(&record).await {
            warn!(error = %e, record_id = %record.id, "Failed to write audit record");
        }
    }
}
