//! Account entities as known to the identity provider.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::entities::credential::CredentialDigest;

/// Closed set of roles an account can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    Secretary,
    Nurse,
    Lab,
    Xray,
    Patient,
    Other,
}

/// A role string outside the closed role set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Admin,
        Role::Doctor,
        Role::Secretary,
        Role::Nurse,
        Role::Lab,
        Role::Xray,
        Role::Patient,
        Role::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Secretary => "secretary",
            Role::Nurse => "nurse",
            Role::Lab => "lab",
            Role::Xray => "xray",
            Role::Patient => "patient",
            Role::Other => "other",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    /// Case-insensitive; `x-ray` and `x ray` are accepted for `xray`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "doctor" => Ok(Role::Doctor),
            "secretary" => Ok(Role::Secretary),
            "nurse" => Ok(Role::Nurse),
            "lab" => Ok(Role::Lab),
            "xray" | "x-ray" | "x ray" => Ok(Role::Xray),
            "patient" => Ok(Role::Patient),
            "other" => Ok(Role::Other),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// Opaque provider-issued account identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// An account as known to the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentity {
    pub id: AccountId,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl AccountIdentity {
    pub fn new(id: impl Into<AccountId>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Case-insensitive substring match against the email
    pub fn email_matches(&self, filter: &str) -> bool {
        self.email
            .to_lowercase()
            .contains(&filter.trim().to_lowercase())
    }
}

/// Everything the provider needs to create a pre-confirmed account
#[derive(Debug, Clone)]
pub struct ProvisionAccount {
    pub email: String,
    pub digest: CredentialDigest,
    pub role: Role,
    pub metadata: HashMap<String, String>,
}

/// One page request at the provider boundary; `page` starts at 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
    pub email_filter: Option<String>,
}

impl PageRequest {
    pub fn first(per_page: u32, email_filter: Option<String>) -> Self {
        Self {
            page: 1,
            per_page,
            email_filter,
        }
    }

    pub fn next(&self) -> Self {
        Self {
            page: self.page + 1,
            ..self.clone()
        }
    }
}

/// A single page of accounts returned by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountPage {
    pub accounts: Vec<AccountIdentity>,
    pub has_more: bool,
}
