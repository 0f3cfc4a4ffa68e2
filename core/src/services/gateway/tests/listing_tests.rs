//! Tests for the lazy account listing

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;

use super::fixtures::*;
use crate::domain::entities::{
    AccountId, AccountIdentity, AccountPage, PageRequest, ProvisionAccount, Role,
    StoredCredential,
};
use crate::errors::{DomainError, ProviderError};
use crate::repositories::IdentityProvider;
use crate::services::authorization::PermissionPolicy;
use crate::services::credential::CredentialVerifier;
use crate::services::gateway::{ElevatedOperationGateway, GatewayConfig, MAX_PAGE_SIZE};

/// Pages the raw account list, then filters each page by email
///
/// `has_more` reflects the raw page, so a page can be empty while later
/// pages still hold matches.
struct FilterAfterFetchProvider {
    accounts: Vec<AccountIdentity>,
}

#[async_trait]
impl IdentityProvider for FilterAfterFetchProvider {
    async fn create_user(
        &self,
        _account: ProvisionAccount,
    ) -> Result<AccountIdentity, ProviderError> {
        Err(ProviderError::Unexpected { status: 501, body: String::new() })
    }

    async fn delete_user_by_admin(&self, _id: &AccountId) -> Result<bool, ProviderError> {
        Ok(false)
    }

    async fn find_user(&self, _id: &AccountId) -> Result<Option<AccountIdentity>, ProviderError> {
        Ok(None)
    }

    async fn update_role(
        &self,
        _id: &AccountId,
        _role: Role,
    ) -> Result<Option<AccountIdentity>, ProviderError> {
        Ok(None)
    }

    async fn list_users(&self, request: &PageRequest) -> Result<AccountPage, ProviderError> {
        let per_page = request.per_page as usize;
        let raw: Vec<AccountIdentity> = self
            .accounts
            .iter()
            .skip((request.page as usize - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect();
        let has_more = raw.len() >= per_page;
        let accounts = raw
            .into_iter()
            .filter(|account| {
                request
                    .email_filter
                    .as_deref()
                    .map_or(true, |filter| account.email_matches(filter))
            })
            .collect();
        Ok(AccountPage { accounts, has_more })
    }

    async fn find_credential(
        &self,
        _email: &str,
    ) -> Result<Option<StoredCredential>, ProviderError> {
        Ok(None)
    }
}

async fn seeded_fixture(page_size: u32) -> Fixture {
    let f = fixture_with(GatewayConfig {
        page_size,
        ..GatewayConfig::default()
    })
    .await;
    for n in 0..5 {
        seed(
            &f.provider,
            &format!("p{}", n),
            &format!("patient{}@clinic.org", n),
            Role::Patient,
        )
        .await;
    }
    seed(&f.provider, "lab1", "bench@lab.example", Role::Lab).await;
    f
}

#[tokio::test]
async fn test_non_admin_cannot_list() {
    let f = fixture().await;
    let err = f.gateway.list_accounts(&nurse(), None).await.err().unwrap();
    assert_eq!(err, DomainError::Forbidden);
}

#[tokio::test]
async fn test_stream_walks_every_page() {
    let f = seeded_fixture(2).await;
    let listing = f.gateway.list_accounts(&admin(), None).await.unwrap();

    let all = listing.collect_all().await.unwrap();
    // two fixture staff accounts plus six seeded
    assert_eq!(all.len(), 8);
}

#[tokio::test]
async fn test_stream_is_restartable() {
    let f = seeded_fixture(3).await;
    let listing = f.gateway.list_accounts(&admin(), None).await.unwrap();

    let first_pass: Vec<_> = listing.stream().take(2).collect().await;
    let second_pass = listing.collect_all().await.unwrap();

    assert_eq!(first_pass.len(), 2);
    assert_eq!(second_pass.len(), 8);
    assert_eq!(first_pass[0].as_ref().unwrap(), &second_pass[0]);
}

#[tokio::test]
async fn test_filter_matches_email_case_insensitively() {
    let f = seeded_fixture(2).await;
    let listing = f
        .gateway
        .list_accounts(&admin(), Some("  PATIENT ".to_string()))
        .await
        .unwrap();

    assert_eq!(listing.email_filter(), Some("PATIENT"));
    let matches = listing.collect_all().await.unwrap();
    assert_eq!(matches.len(), 5);
    assert!(matches.iter().all(|a| a.email.starts_with("patient")));
}

#[tokio::test]
async fn test_single_page() {
    let f = seeded_fixture(50).await;
    let listing = f
        .gateway
        .list_accounts(&admin(), None)
        .await
        .unwrap()
        .with_page_size(3);

    let page = listing.page(1).await.unwrap();
    assert_eq!(page.accounts.len(), 3);
    assert!(page.has_more);

    let last = listing.page(3).await.unwrap();
    assert_eq!(last.accounts.len(), 2);
    assert!(!last.has_more);

    assert!(matches!(listing.page(0).await, Err(DomainError::Validation { .. })));
}

#[tokio::test]
async fn test_page_size_is_clamped() {
    let f = fixture().await;
    let listing = f.gateway.list_accounts(&admin(), None).await.unwrap();

    assert_eq!(listing.clone().with_page_size(0).per_page(), 1);
    assert_eq!(listing.with_page_size(100_000).per_page(), MAX_PAGE_SIZE);
}

#[tokio::test]
async fn test_stream_surfaces_upstream_failure() {
    let f = seeded_fixture(2).await;
    let listing = f.gateway.list_accounts(&admin(), None).await.unwrap();
    f.provider.set_unavailable(true).await;

    let items: Vec<_> = listing.stream().collect().await;
    assert_eq!(items.len(), 1);
    assert!(matches!(items[0], Err(DomainError::Upstream { .. })));
}

#[tokio::test]
async fn test_stream_continues_past_page_with_no_matches() {
    let provider = FilterAfterFetchProvider {
        accounts: vec![
            AccountIdentity::new("a", "a@x.org", Role::Patient),
            AccountIdentity::new("b", "b@x.org", Role::Patient),
            AccountIdentity::new("c", "bob@x.org", Role::Nurse),
        ],
    };
    let gateway: ElevatedOperationGateway<FilterAfterFetchProvider> = ElevatedOperationGateway::new(
        Arc::new(provider),
        Arc::new(CredentialVerifier::new(4 /* bcrypt minimum cost */).unwrap()),
        Arc::new(PermissionPolicy::default()),
        GatewayConfig {
            page_size: 2,
            ..GatewayConfig::default()
        },
    );

    let listing = gateway
        .list_accounts(&admin(), Some("bob".to_string()))
        .await
        .unwrap();

    let first = listing.page(1).await.unwrap();
    assert!(first.accounts.is_empty());
    assert!(first.has_more);

    let found = listing.collect_all().await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].email, "bob@x.org");
}
