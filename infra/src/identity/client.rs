//! reqwest implementation of the identity provider port

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::redirect::Policy;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use cg_core::{
    AccountId, AccountIdentity, AccountPage, IdentityProvider, PageRequest, ProviderError,
    ProvisionAccount, Role, StoredCredential,
};
use cg_shared::ProcessConfig;

use super::wire::{
    classify_status, decode, decode_credential, decode_delete_result, CreateUserBody,
    CredentialArgs, DeleteUserArgs, ListUsersResponse, ProviderUser, RoleClaim, UpdateRoleBody,
};
use crate::InfrastructureError;

const ADMIN_USERS: [&str; 4] = ["auth", "v1", "admin", "users"];
const RPC_DELETE_USER: &str = "delete_user_by_admin";
const RPC_CREDENTIAL_DIGEST: &str = "get_credential_digest";

/// Identity provider reached over HTTP with the elevated credential
///
/// The credential is baked into the client's default headers as sensitive
/// values and is never stored anywhere else. Requests carry the configured
/// timeout and never follow redirects.
pub struct HttpIdentityProvider {
    client: Client,
    base: Url,
}

impl HttpIdentityProvider {
    pub fn from_config(config: &ProcessConfig) -> Result<Self, InfrastructureError> {
        Self::new(
            config.service_endpoint(),
            config.elevated_credential(),
            config.provider_timeout(),
        )
    }

    pub fn new(
        endpoint: &Url,
        elevated_credential: &SecretString,
        timeout: Duration,
    ) -> Result<Self, InfrastructureError> {
        if endpoint.cannot_be_a_base() {
            return Err(InfrastructureError::Config(format!(
                "provider endpoint {} cannot carry a path",
                endpoint
            )));
        }

        let client = Client::builder()
            .default_headers(elevated_headers(elevated_credential)?)
            .timeout(timeout)
            .redirect(Policy::none())
            .build()?;

        debug!(
            endpoint = %endpoint,
            timeout_secs = timeout.as_secs(),
            "Identity provider client initialized"
        );

        Ok(Self {
            client,
            base: endpoint.clone(),
        })
    }

    /// Endpoint URL with `segments` appended, each percent-encoded
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn user_url(&self, id: &AccountId) -> Url {
        self.url(&["auth", "v1", "admin", "users", id.as_str()])
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, ProviderError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if status.is_success() {
            return Ok(body.to_vec());
        }

        let error = classify_status(status, &String::from_utf8_lossy(&body));
        if let ProviderError::Unexpected { status, .. } = &error {
            warn!(status = *status, "Identity provider returned an unexpected status");
        }
        Err(error)
    }

    async fn rpc<A>(&self, name: &str, args: &A) -> Result<Vec<u8>, ProviderError>
    where
        A: Serialize + Sync,
    {
        debug!(rpc = name, "Calling identity provider RPC");
        let url = self.url(&["rest", "v1", "rpc", name]);

        // A 404 here means the function is not exposed, not a missing account
        self.send(self.client.post(url).json(args))
            .await
            .map_err(|e| match e {
                ProviderError::NotFound => ProviderError::Unexpected {
                    status: 404,
                    body: format!("rpc {} is not exposed", name),
                },
                other => other,
            })
    }
}

impl fmt::Debug for HttpIdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpIdentityProvider")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn create_user(
        &self,
        account: ProvisionAccount,
    ) -> Result<AccountIdentity, ProviderError> {
        let body = CreateUserBody {
            email: &account.email,
            password_hash: account.digest.as_str(),
            email_confirm: true,
            user_metadata: &account.metadata,
            app_metadata: RoleClaim { role: account.role },
        };

        let bytes = self
            .send(self.client.post(self.url(&ADMIN_USERS)).json(&body))
            .await?;
        decode::<ProviderUser>(&bytes)?.into_identity()
    }

    async fn delete_user_by_admin(&self, id: &AccountId) -> Result<bool, ProviderError> {
        let args = DeleteUserArgs {
            user_id_to_delete: id.as_str(),
        };
        decode_delete_result(&self.rpc(RPC_DELETE_USER, &args).await?)
    }

    async fn find_user(&self, id: &AccountId) -> Result<Option<AccountIdentity>, ProviderError> {
        match self.send(self.client.get(self.user_url(id))).await {
            Ok(bytes) => decode::<ProviderUser>(&bytes)?.into_identity().map(Some),
            Err(ProviderError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn update_role(
        &self,
        id: &AccountId,
        role: Role,
    ) -> Result<Option<AccountIdentity>, ProviderError> {
        let body = UpdateRoleBody {
            app_metadata: RoleClaim { role },
        };

        match self
            .send(self.client.put(self.user_url(id)).json(&body))
            .await
        {
            Ok(bytes) => decode::<ProviderUser>(&bytes)?.into_identity().map(Some),
            Err(ProviderError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list_users(&self, request: &PageRequest) -> Result<AccountPage, ProviderError> {
        let mut url = self.url(&ADMIN_USERS);
        url.query_pairs_mut()
            .append_pair("page", &request.page.to_string())
            .append_pair("per_page", &request.per_page.to_string());

        let bytes = self.send(self.client.get(url)).await?;
        let response: ListUsersResponse = decode(&bytes)?;

        // The provider has no email filter, so a full raw page means more may follow
        let has_more =
            !response.users.is_empty() && response.users.len() >= request.per_page as usize;

        let accounts = response
            .users
            .into_iter()
            .filter_map(|user| {
                let id = user.id.clone();
                match user.into_identity() {
                    Ok(account) => Some(account),
                    Err(e) => {
                        warn!(
                            account_id = %id,
                            error = %e,
                            "Skipping account with an unreadable role"
                        );
                        None
                    }
                }
            })
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
        email: &str,
    ) -> Result<Option<StoredCredential>, ProviderError> {
        let args = CredentialArgs {
            account_email: email,
        };
        decode_credential(&self.rpc(RPC_CREDENTIAL_DIGEST, &args).await?)
    }
}

fn elevated_headers(elevated_credential: &SecretString) -> Result<HeaderMap, InfrastructureError> {
    let invalid =
        || InfrastructureError::Config("elevated credential is not a valid header value".to_string());
    let key = elevated_credential.expose_secret();

    let mut apikey = HeaderValue::from_str(key).map_err(|_| invalid())?;
    apikey.set_sensitive(true);
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", key)).map_err(|_| invalid())?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert("apikey", apikey);
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}

fn transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Transport(error.to_string())
    }
}
