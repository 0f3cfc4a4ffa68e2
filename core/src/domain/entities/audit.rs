//! Audit record written after each privileged operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::account::AccountId;
use crate::domain::entities::operation::Operation;

/// Result of an audited operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuditOutcome {
    Success,
    /// `error_kind` is a stable error code, never a provider message
    Failure { error_kind: String },
}

impl AuditOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AuditOutcome::Success)
    }
}

/// Who did what to which account, and how it ended
///
/// Never carries credentials, digests or the elevated key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub actor_id: AccountId,
    pub operation: Operation,
    pub target_id: Option<AccountId>,
    pub outcome: AuditOutcome,
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(actor_id: AccountId, operation: Operation, outcome: AuditOutcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor_id,
            operation,
            target_id: None,
            outcome,
            created_at: Utc::now(),
        }
    }

    /// Add the target account
    pub fn with_target(mut self, target_id: AccountId) -> Self {
        self.target_id = Some(target_id);
        self
    }
}
