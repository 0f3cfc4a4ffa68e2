//! Identity provider port used by the gateway and the login service.

use async_trait::async_trait;

use crate::domain::entities::{
    AccountId, AccountIdentity, AccountPage, PageRequest, ProvisionAccount, Role,
    StoredCredential,
};
use crate::errors::ProviderError;

/// Boundary to the external identity provider
///
/// Implementations hold the elevated credential. Nothing returned from
/// these methods may contain it.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a pre-confirmed account
    ///
    /// # Returns
    /// * `Ok(AccountIdentity)` - The created account with its provider-issued id
    /// * `Err(ProviderError::Conflict)` - The email is already registered
    async fn create_user(&self, account: ProvisionAccount)
        -> Result<AccountIdentity, ProviderError>;

    /// Atomic provider-side delete that cascades dependent records
    ///
    /// Only `Ok(true)` means the account was removed.
    async fn delete_user_by_admin(&self, id: &AccountId) -> Result<bool, ProviderError>;

    async fn find_user(&self, id: &AccountId) -> Result<Option<AccountIdentity>, ProviderError>;

    /// Single atomic role update; `Ok(None)` when the account does not exist
    async fn update_role(
        &self,
        id: &AccountId,
        role: Role,
    ) -> Result<Option<AccountIdentity>, ProviderError>;

    async fn list_users(&self, request: &PageRequest) -> Result<AccountPage, ProviderError>;

    /// Stored digest for login verification
    async fn find_credential(&self, email: &str)
        -> Result<Option<StoredCredential>, ProviderError>;
}
