//! Request and response bodies exchanged with the identity provider.
//!
//! The role lives in `app_metadata`, which only the elevated credential can
//! write. Free-form account metadata goes to `user_metadata`.

use std::collections::HashMap;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use cg_core::{AccountIdentity, CredentialDigest, ProviderError, Role, StoredCredential};

/// Upper bound on provider error text kept for the server log
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Serialize)]
pub(crate) struct CreateUserBody<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub email_confirm: bool,
    pub user_metadata: &'a HashMap<String, String>,
    pub app_metadata: RoleClaim,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateRoleBody {
    pub app_metadata: RoleClaim,
}

#[derive(Debug, Serialize)]
pub(crate) struct RoleClaim {
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteUserArgs<'a> {
    pub user_id_to_delete: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CredentialArgs<'a> {
    pub account_email: &'a str,
}

/// User object as returned by the admin users API
#[derive(Debug, Deserialize)]
pub(crate) struct ProviderUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub app_metadata: Option<Map<String, Value>>,
    #[serde(default)]
    pub user_metadata: Option<Map<String, Value>>,
}

impl ProviderUser {
    pub fn into_identity(self) -> Result<AccountIdentity, ProviderError> {
        let role = role_from_claim(self.app_metadata.as_ref().and_then(|m| m.get("role")))?;
        let metadata = self
            .user_metadata
            .map(flatten_metadata)
            .unwrap_or_default();

        Ok(AccountIdentity::new(self.id, self.email.unwrap_or_default(), role)
            .with_metadata(metadata))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListUsersResponse {
    #[serde(default)]
    pub users: Vec<ProviderUser>,
}

/// Row returned by the `get_credential_digest` RPC
#[derive(Debug, Deserialize)]
struct CredentialRow {
    id: String,
    email: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    digest: Option<String>,
}

/// Accounts provisioned before roles existed carry none; treat them as patients
fn role_from_claim(claim: Option<&Value>) -> Result<Role, ProviderError> {
    match claim {
        None | Some(Value::Null) => Ok(Role::Patient),
        Some(Value::String(raw)) => raw
            .parse::<Role>()
            .map_err(|e| ProviderError::Decode(e.to_string())),
        Some(other) => Err(ProviderError::Decode(format!(
            "role claim must be a string, got {}",
            json_kind(other)
        ))),
    }
}

/// Keep scalar metadata values as strings; nested values are dropped
fn flatten_metadata(raw: Map<String, Value>) -> HashMap<String, String> {
    raw.into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            Value::Bool(b) => Some((key, b.to_string())),
            Value::Number(n) => Some((key, n.to_string())),
            _ => None,
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Deserialize a provider body without echoing any of its content
pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProviderError> {
    serde_json::from_slice(bytes).map_err(|e| {
        ProviderError::Decode(format!(
            "{:?} error at line {}, column {}",
            e.classify(),
            e.line(),
            e.column()
        ))
    })
}

/// Result of the `delete_user_by_admin` RPC; `null` counts as refused
pub(crate) fn decode_delete_result(bytes: &[u8]) -> Result<bool, ProviderError> {
    match decode::<Value>(bytes)? {
        Value::Bool(deleted) => Ok(deleted),
        Value::Null => Ok(false),
        other => Err(ProviderError::Decode(format!(
            "delete result must be a boolean, got {}",
            json_kind(&other)
        ))),
    }
}

/// Result of the `get_credential_digest` RPC
///
/// The RPC may answer with a single row, a set of rows or `null`. Accounts
/// without a stored digest (external sign-in only) are reported as absent.
pub(crate) fn decode_credential(bytes: &[u8]) -> Result<Option<StoredCredential>, ProviderError> {
    let row = match decode::<Value>(bytes)? {
        Value::Null => return Ok(None),
        Value::Array(rows) => match rows.into_iter().next() {
            Some(row) => row,
            None => return Ok(None),
        },
        row @ Value::Object(_) => row,
        other => {
            return Err(ProviderError::Decode(format!(
                "credential row must be an object, got {}",
                json_kind(&other)
            )))
        }
    };

    let row: CredentialRow = serde_json::from_value(row)
        .map_err(|e| ProviderError::Decode(format!("credential row: {:?} error", e.classify())))?;

    let digest = match row.digest {
        Some(digest) if !digest.is_empty() => digest,
        _ => return Ok(None),
    };
    let role = role_from_claim(row.role.map(Value::String).as_ref())?;

    Ok(Some(StoredCredential {
        account: AccountIdentity::new(row.id, row.email, role),
        digest: CredentialDigest::from_stored(digest),
    }))
}

/// Map a non-success status to an adapter error
pub(crate) fn classify_status(status: StatusCode, body: &str) -> ProviderError {
    match status {
        StatusCode::NOT_FOUND => ProviderError::NotFound,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Forbidden,
        StatusCode::CONFLICT => ProviderError::Conflict,
        StatusCode::UNPROCESSABLE_ENTITY if reports_duplicate_email(body) => {
            ProviderError::Conflict
        }
        _ => ProviderError::Unexpected {
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        },
    }
}

fn reports_duplicate_email(body: &str) -> bool {
    let body = body.to_ascii_lowercase();
    body.contains("email_exists") || body.contains("already been registered")
}
