//! In-memory implementation of AuditLogRepository.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::AuditLogRepository;
use crate::domain::entities::{AccountId, AuditRecord};
use crate::errors::DomainError;

/// Keeps records in process memory; can be told to fail for tests
pub struct InMemoryAuditLogRepository {
    records: Arc<RwLock<Vec<AuditRecord>>>,
    should_fail: Arc<RwLock<bool>>,
}

impl InMemoryAuditLogRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            should_fail: Arc::new(RwLock::new(false)),
        }
    }

    /// Set whether writes should fail
    pub async fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.write().await = should_fail;
    }

    /// All stored records in write order
    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.read().await.clone()
    }
}

impl Default for InMemoryAuditLogRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLogRepository {
    async fn create(&self, record: &AuditRecord) -> Result<(), DomainError> {
        if *self.should_fail.read().await {
            return Err(DomainError::Internal {
                message: "audit store unavailable".to_string(),
            });
        }

        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn find_by_actor(
        &self,
        actor_id: &AccountId,
        limit: usize,
    ) -> Result<Vec<AuditRecord>, DomainError> {
        let records = self.records.read().await;
        let mut result: Vec<AuditRecord> = records
            .iter()
            .filter(|record| &record.actor_id == actor_id)
            .cloned()
            .collect();

        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result.truncate(limit);
        Ok(result)
    }
}
