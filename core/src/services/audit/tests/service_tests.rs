//! Tests for the audit service

use std::sync::Arc;

use crate::domain::entities::{AccountId, AuditOutcome, Caller, Operation, Role};
use crate::errors::DomainError;
use crate::repositories::InMemoryAuditLogRepository;
use crate::services::audit::{AuditService, AuditServiceConfig};

fn service(repo: Arc<InMemoryAuditLogRepository>) -> AuditService<InMemoryAuditLogRepository> {
    AuditService::new(repo, AuditServiceConfig { async_writes: false })
}

#[tokio::test]
async fn test_success_is_recorded_with_target() {
    let repo = Arc::new(InMemoryAuditLogRepository::new());
    let audit = service(repo.clone());
    let admin = Caller::new("1", Role::Admin);
    let target = AccountId::new("42");

    audit
        .record_outcome(&admin, Operation::DeleteAccount, Some(&target), &Ok::<(), DomainError>(()))
        .await;

    let records = repo.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].actor_id, AccountId::new("1"));
    assert_eq!(records[0].target_id, Some(target));
    assert_eq!(records[0].outcome, AuditOutcome::Success);
}

#[tokio::test]
async fn test_failure_records_error_code_only() {
    let repo = Arc::new(InMemoryAuditLogRepository::new());
    let audit = service(repo.clone());
    let nurse = Caller::new("9", Role::Nurse);

    audit
        .record_outcome(&nurse, Operation::ListAccounts, None, &Err::<(), _>(DomainError::Forbidden))
        .await;

    let records = repo.records().await;
    assert_eq!(
        records[0].outcome,
        AuditOutcome::Failure {
            error_kind: "FORBIDDEN".to_string()
        }
    );
    assert!(records[0].target_id.is_none());
}

#[tokio::test]
async fn test_repository_failure_is_swallowed() {
    let repo = Arc::new(InMemoryAuditLogRepository::new());
    repo.set_should_fail(true).await;
    let audit = service(repo.clone());

    audit
        .record_outcome(
            &Caller::new("1", Role::Admin),
            Operation::CreateAccount,
            None,
            &Ok::<(), DomainError>(()),
        )
        .await;

    assert!(repo.records().await.is_empty());
}
