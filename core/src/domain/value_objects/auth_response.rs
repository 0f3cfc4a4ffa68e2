//! Login response value object.

use serde::Serialize;

use crate::domain::entities::account::AccountIdentity;

/// Result of a successful login
///
/// Contains the signed session token, its lifetime in seconds and the
/// authenticated account. Never carries the credential or its digest.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub token: String,
    pub expires_in: i64,
    pub account: AccountIdentity,
}

impl LoginResult {
    pub fn new(token: String, expires_in: i64, account: AccountIdentity) -> Self {
        Self {
            token,
            expires_in,
            account,
        }
    }
}
