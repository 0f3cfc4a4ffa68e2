//! In-memory identity provider for tests and local development

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{
    AccountId, AccountIdentity, AccountPage, CredentialDigest, PageRequest, ProvisionAccount,
    Role, StoredCredential,
};
use crate::errors::ProviderError;

use super::IdentityProvider;

#[derive(Debug, Clone)]
struct StoredAccount {
    identity: AccountIdentity,
    digest: CredentialDigest,
}

#[derive(Debug, Default)]
struct Behaviour {
    deny_deletions: bool,
    unavailable: bool,
    latency: Option<Duration>,
}

/// In-memory identity provider
///
/// Accounts are kept in insertion order so listing is stable. The behaviour
/// switches let tests simulate a provider that refuses the elevated
/// credential, is unreachable, or is slow.
pub struct InMemoryIdentityProvider {
    accounts: Arc<RwLock<Vec<StoredAccount>>>,
    behaviour: Arc<RwLock<Behaviour>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(Vec::new())),
            behaviour: Arc::new(RwLock::new(Behaviour::default())),
        }
    }

    /// Seed an account with a known id
    pub async fn insert(&self, identity: AccountIdentity, digest: CredentialDigest) {
        let mut accounts = self.accounts.write().await;
        accounts.retain(|a| a.identity.id != identity.id);
        accounts.push(StoredAccount { identity, digest });
    }

    pub async fn contains(&self, id: &AccountId) -> bool {
        self.accounts.read().await.iter().any(|a| &a.identity.id == id)
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Make `delete_user_by_admin` answer `false` without deleting
    pub async fn set_deny_deletions(&self, deny: bool) {
        self.behaviour.write().await.deny_deletions = deny;
    }

    /// Make every call fail with a transport error
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.behaviour.write().await.unavailable = unavailable;
    }

    /// Delay every call by `latency`
    pub async fn set_latency(&self, latency: Option<Duration>) {
        self.behaviour.write().await.latency = latency;
    }

    async fn simulate(&self) -> Result<(), ProviderError> {
        let (latency, unavailable) = {
            let behaviour = self.behaviour.read().await;
            (behaviour.latency, behaviour.unavailable)
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if unavailable {
            return Err(ProviderError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn create_user(
        &self,
        account: ProvisionAccount,
    ) -> Result<AccountIdentity, ProviderError> {
        self.simulate().await?;
        let mut accounts = self.accounts.write().await;

        if accounts
            .iter()
            .any(|a| a.identity.email.eq_ignore_ascii_case(&account.email))
        {
            return Err(ProviderError::Conflict);
        }

        let identity = AccountIdentity::new(Uuid::new_v4().to_string(), account.email, account.role)
            .with_metadata(account.metadata);
        accounts.push(StoredAccount {
            identity: identity.clone(),
            digest: account.digest,
        });
        Ok(identity)
    }

    async fn delete_user_by_admin(&self, id: &AccountId) -> Result<bool, ProviderError> {
        self.simulate().await?;
        if self.behaviour.read().await.deny_deletions {
            return Ok(false);
        }

        let mut accounts = self.accounts.write().await;
        let before = accounts.len();
        accounts.retain(|a| &a.identity.id != id);
        Ok(accounts.len() < before)
    }

    async fn find_user(&self, id: &AccountId) -> Result<Option<AccountIdentity>, ProviderError> {
        self.simulate().await?;
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|a| &a.identity.id == id)
            .map(|a| a.identity.clone()))
    }

    async fn update_role(
        &self,
        id: &AccountId,
        role: Role,
    ) -> Result<Option<AccountIdentity>, ProviderError> {
        self.simulate().await?;
        let mut accounts = self.accounts.write().await;
        Ok(accounts
            .iter_mut()
            .find(|a| &a.identity.id == id)
            .map(|a| {
                a.identity.role = role;
                a.identity.clone()
            }))
    }

    async fn list_users(&self, request: &PageRequest) -> Result<AccountPage, ProviderError> {
        self.simulate().await?;
        let accounts = self.accounts.read().await;

        let matching: Vec<&AccountIdentity> = accounts
            .iter()
            .map(|a| &a.identity)
            .filter(|identity| {
                request
                    .email_filter
                    .as_deref()
                    .map_or(true, |filter| identity.email_matches(filter))
            })
            .collect();

        let per_page = request.per_page.max(1) as usize;
        let start = (request.page.max(1) as usize - 1) * per_page;
        let page: Vec<AccountIdentity> = matching
            .iter()
            .skip(start)
            .take(per_page)
            .map(|identity| (*identity).clone())
            .collect();

        Ok(AccountPage {
            has_more: start + page.len() < matching.len(),
            accounts: page,
        })
    }

    async fn find_credential(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredential>, ProviderError> {
        self.simulate().await?;
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|a| a.identity.email.eq_ignore_ascii_case(email.trim()))
            .map(|a| StoredCredential {
                account: a.identity.clone(),
                digest: a.digest.clone(),
            }))
    }
}
