//! Elevated operation gateway implementation

use std::sync::Arc;

use cg_shared::validation::validators;
use tracing::{info, warn};

use crate::domain::entities::{
    AccountId, AccountIdentity, AuthorizationContext, Caller, Operation, ProvisionAccount, Role,
    MAX_CREDENTIAL_BYTES, MIN_CREDENTIAL_BYTES,
};
use crate::domain::value_objects::Acknowledgement;
use crate::errors::{DomainError, DomainResult, ProviderError};
use crate::repositories::audit::NoOpAuditLogRepository;
use crate::repositories::{AuditLogRepository, IdentityProvider};
use crate::services::audit::AuditService;
use crate::services::authorization::PermissionPolicy;
use crate::services::credential::CredentialVerifier;

use super::config::GatewayConfig;
use super::listing::AccountListing;
use super::types::CreateAccountRequest;
use super::upstream::{bounded, upstream};

/// Performs privileged account-lifecycle operations for authorized callers
///
/// The provider adapter behind `P` is the only holder of the elevated
/// credential. Every operation checks the policy before touching the
/// provider, so unauthorized callers learn nothing about the target.
/// Provider calls are never retried.
pub struct ElevatedOperationGateway<P, A = NoOpAuditLogRepository>
where
    P: IdentityProvider + 'static,
    A: AuditLogRepository + 'static,
{
    provider: Arc<P>,
    verifier: Arc<CredentialVerifier>,
    policy: Arc<PermissionPolicy>,
    audit_service: Option<Arc<AuditService<A>>>,
    config: GatewayConfig,
}

impl<P, A> ElevatedOperationGateway<P, A>
where
    P: IdentityProvider + 'static,
    A: AuditLogRepository + 'static,
{
    pub fn new(
        provider: Arc<P>,
        verifier: Arc<CredentialVerifier>,
        policy: Arc<PermissionPolicy>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            provider,
            verifier,
            policy,
            audit_service: None,
            config,
        }
    }

    /// Create a gateway that writes an audit record for every operation
    pub fn with_audit(
        provider: Arc<P>,
        verifier: Arc<CredentialVerifier>,
        policy: Arc<PermissionPolicy>,
        audit_service: Arc<AuditService<A>>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            provider,
            verifier,
            policy,
            audit_service: Some(audit_service),
            config,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Look up the caller's current role
    ///
    /// A session token may outlive a role change, so the role is always read
    /// from the provider. Unknown callers are `Forbidden`.
    pub async fn resolve_caller(&self, caller_id: &AccountId) -> DomainResult<Caller> {
        match bounded(self.config.provider_timeout, self.provider.find_user(caller_id)).await {
            Ok(Some(account)) => Ok(Caller::new(account.id, account.role)),
            Ok(None) => {
                warn!(caller_id = %caller_id, "Session subject no longer exists");
                Err(DomainError::Forbidden)
            }
            Err(e) => Err(upstream("resolve_caller", &e)),
        }
    }

    /// Provision a pre-confirmed account
    ///
    /// # Errors
    /// * `Forbidden` - the caller's role may not create accounts
    /// * `Validation` - malformed email, credential length outside 8..=72 bytes, blank metadata key
    /// * `Conflict` - the email is already registered
    /// * `Upstream` - any other provider failure, including timeout
    pub async fn create_account(
        &self,
        caller: &Caller,
        request: CreateAccountRequest,
    ) -> DomainResult<AccountIdentity> {
        let result = self.create_account_unaudited(caller, request).await;
        let target = result.as_ref().ok().map(|account| account.id.clone());
        self.finish(caller, Operation::CreateAccount, target.as_ref(), &result)
            .await;
        result
    }

    async fn create_account_unaudited(
        &self,
        caller: &Caller,
        request: CreateAccountRequest,
    ) -> DomainResult<AccountIdentity> {
        self.policy
            .authorize(&AuthorizationContext::new(caller, Operation::CreateAccount))?;

        let CreateAccountRequest {
            email,
            credential,
            role,
            metadata,
        } = request;

        let email = email.trim().to_string();
        if !validators::not_blank(&email) {
            return Err(DomainError::validation("email", "is required"));
        }
        if !validators::is_valid_email(&email) {
            return Err(DomainError::validation("email", "must be a valid email address"));
        }
        if !credential.meets_length_policy() {
            return Err(DomainError::validation(
                "credential",
                format!(
                    "must be between {} and {} bytes",
                    MIN_CREDENTIAL_BYTES, MAX_CREDENTIAL_BYTES
                ),
            ));
        }
        if metadata.keys().any(|key| !validators::not_blank(key)) {
            return Err(DomainError::validation("metadata", "keys must not be empty"));
        }

        let digest = self.verifier.digest_blocking(credential).await?;
        let account = ProvisionAccount {
            email,
            digest,
            role,
            metadata,
        };

        bounded(self.config.provider_timeout, self.provider.create_user(account))
            .await
            .map_err(|e| match e {
                ProviderError::Conflict => DomainError::Conflict,
                other => upstream(Operation::CreateAccount.as_str(), &other),
            })
    }

    /// Delete an account and, provider-side, everything that references it
    ///
    /// Irreversible. A second delete of the same id is `NotFound`.
    pub async fn delete_account(
        &self,
        caller: &Caller,
        account_id: &AccountId,
    ) -> DomainResult<Acknowledgement> {
        let result = self.delete_account_unaudited(caller, account_id).await;
        self.finish(caller, Operation::DeleteAccount, Some(account_id), &result)
            .await;
        result
    }

    async fn delete_account_unaudited(
        &self,
        caller: &Caller,
        account_id: &AccountId,
    ) -> DomainResult<Acknowledgement> {
        self.policy
            .authorize(&AuthorizationContext::new(caller, Operation::DeleteAccount))?;
        require_account_id(account_id)?;

        let deleted = bounded(
            self.config.provider_timeout,
            self.provider.delete_user_by_admin(account_id),
        )
        .await;

        match deleted {
            Ok(true) => Ok(Acknowledgement::confirmed()),
            Ok(false) => self.explain_refused_delete(account_id).await,
            Err(e) => Err(translate_mutation_error(Operation::DeleteAccount, e)),
        }
    }

    /// A falsy delete result is either a missing account or a refused credential
    async fn explain_refused_delete(&self, account_id: &AccountId) -> DomainResult<Acknowledgement> {
        match bounded(self.config.provider_timeout, self.provider.find_user(account_id)).await {
            Ok(None) => Err(DomainError::NotFound),
            Ok(Some(_)) => {
                warn!(
                    account_id = %account_id,
                    "Provider refused deletion of an existing account"
                );
                Err(DomainError::Forbidden)
            }
            Err(e) => Err(upstream(Operation::DeleteAccount.as_str(), &e)),
        }
    }

    /// Replace an account's role in one provider update
    pub async fn change_role(
        &self,
        caller: &Caller,
        account_id: &AccountId,
        new_role: Role,
    ) -> DomainResult<AccountIdentity> {
        let result = self
            .change_role_unaudited(caller, account_id, new_role)
            .await;
        self.finish(caller, Operation::ChangeRole, Some(account_id), &result)
            .await;
        result
    }

    async fn change_role_unaudited(
        &self,
        caller: &Caller,
        account_id: &AccountId,
        new_role: Role,
    ) -> DomainResult<AccountIdentity> {
        self.policy
            .authorize(&AuthorizationContext::new(caller, Operation::ChangeRole))?;
        require_account_id(account_id)?;

        match bounded(
            self.config.provider_timeout,
            self.provider.update_role(account_id, new_role),
        )
        .await
        {
            Ok(Some(account)) => Ok(account),
            Ok(None) => Err(DomainError::NotFound),
            Err(e) => Err(translate_mutation_error(Operation::ChangeRole, e)),
        }
    }

    /// Lazy listing of accounts whose email contains `filter`
    ///
    /// Only the permission check happens here; pages are fetched when the
    /// listing is consumed.
    pub async fn list_accounts(
        &self,
        caller: &Caller,
        filter: Option<String>,
    ) -> DomainResult<AccountListing<P>> {
        let result = self
            .policy
            .authorize(&AuthorizationContext::new(caller, Operation::ListAccounts))
            .map(|()| {
                let filter = filter
                    .map(|f| f.trim().to_string())
                    .filter(|f| !f.is_empty());
                AccountListing::new(
                    Arc::clone(&self.provider),
                    filter,
                    self.config.page_size,
                    self.config.provider_timeout,
                )
            });
        self.finish(caller, Operation::ListAccounts, None, &result)
            .await;
        result
    }

    async fn finish<T>(
        &self,
        caller: &Caller,
        operation: Operation,
        target: Option<&AccountId>,
        result: &DomainResult<T>,
    ) {
        match result {
            Ok(_) => info!(
                actor_id = %caller.id,
                operation = %operation,
                target_id = target.map(AccountId::as_str).unwrap_or("-"),
                "Privileged operation succeeded"
            ),
            Err(e) => warn!(
                actor_id = %caller.id,
                operation = %operation,
                target_id = target.map(AccountId::as_str).unwrap_or("-"),
                error = e.code(),
                "Privileged operation failed"
            ),
        }

        if let Some(audit) = &self.audit_service {
            audit.record_outcome(caller, operation, target, result).await;
        }
    }
}

fn require_account_id(account_id: &AccountId) -> DomainResult<()> {
    if account_id.is_blank() {
        return Err(DomainError::validation("accountId", "is required"));
    }
    Ok(())
}

/// Mapping shared by delete and change-role
fn translate_mutation_error(operation: Operation, error: ProviderError) -> DomainError {
    match error {
        ProviderError::NotFound => DomainError::NotFound,
        ProviderError::Forbidden => DomainError::Forbidden,
        other => upstream(operation.as_str(), &other),
    }
}
