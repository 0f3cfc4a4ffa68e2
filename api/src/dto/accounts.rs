use std::collections::HashMap;

use cg_core::{AccountIdentity, AccountPage};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/v1/admin/create-account`
///
/// Length and email rules are enforced by the gateway; only presence is
/// checked here. Not `Debug` because of the credential.
#[derive(Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 320, message = "is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "is required"))]
    pub credential: String,

    /// Defaults to `patient`
    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub account_id: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRoleRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub account_id: String,

    #[validate(length(min = 1, message = "is required"))]
    pub role: String,
}

/// Query of `GET /api/v1/admin/accounts`
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListAccountsQuery {
    /// Case-insensitive email substring
    pub q: Option<String>,

    #[validate(range(min = 1, message = "must be at least 1"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 1000, message = "must be between 1 and 1000"))]
    pub per_page: Option<u32>,
}

/// Account as returned to callers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub metadata: HashMap<String, String>,
}

impl From<AccountIdentity> for AccountResponse {
    fn from(account: AccountIdentity) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email,
            role: account.role.to_string(),
            metadata: account.metadata,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountListResponse {
    pub accounts: Vec<AccountResponse>,
    pub page: u32,
    pub per_page: u32,
    pub has_more: bool,
}

impl AccountListResponse {
    pub fn from_page(page: AccountPage, page_number: u32, per_page: u32) -> Self {
        Self {
            accounts: page.accounts.into_iter().map(AccountResponse::from).collect(),
            page: page_number,
            per_page,
            has_more: page.has_more,
        }
    }
}
