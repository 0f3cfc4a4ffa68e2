//! Tests for the in-memory audit log repository

use crate::domain::entities::{AccountId, AuditOutcome, AuditRecord, Operation};
use crate::repositories::audit::{
    InMemoryAuditLogRepository, NoOpAuditLogRepository, TracingAuditLogRepository,
};
use crate::repositories::AuditLogRepository;

fn record(actor: &str, operation: Operation) -> AuditRecord {
    AuditRecord::new(AccountId::new(actor), operation, AuditOutcome::Success)
}

#[tokio::test]
async fn test_create_and_find_by_actor() {
    let repo = InMemoryAuditLogRepository::new();

    repo.create(&record("1", Operation::CreateAccount)).await.unwrap();
    repo.create(&record("1", Operation::DeleteAccount)).await.unwrap();
    repo.create(&record("2", Operation::ListAccounts)).await.unwrap();

    let found = repo.find_by_actor(&AccountId::new("1"), 10).await.unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|r| r.actor_id == AccountId::new("1")));

    let limited = repo.find_by_actor(&AccountId::new("1"), 1).await.unwrap();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn test_failing_repository() {
    let repo = InMemoryAuditLogRepository::new();
    repo.set_should_fail(true).await;

    assert!(repo.create(&record("1", Operation::ChangeRole)).await.is_err());
    assert!(repo.records().await.is_empty());
}

#[tokio::test]
async fn test_noop_repository() {
    let repo = NoOpAuditLogRepository::new();
    repo.create(&record("1", Operation::ChangeRole)).await.unwrap();
    assert!(repo.find_by_actor(&AccountId::new("1"), 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_tracing_repository_accepts_every_outcome() {
    let repo = TracingAuditLogRepository::new();

    repo.create(&record("1", Operation::ChangeRole).with_target(AccountId::new("42")))
        .await
        .unwrap();
    let failed = AuditRecord::new(
        AccountId::new("9"),
        Operation::DeleteAccount,
        AuditOutcome::Failure {
            error_kind: "FORBIDDEN".to_string(),
        },
    );
    repo.create(&failed).await.unwrap();

    assert!(repo
        .find_by_actor(&AccountId::new("1"), 10)
        .await
        .unwrap()
        .is_empty());
}
