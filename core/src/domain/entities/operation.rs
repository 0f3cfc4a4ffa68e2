//! Privileged operations and the per-request authorization context.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::entities::account::{AccountId, Role};

/// Privileged account-lifecycle operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    CreateAccount,
    DeleteAccount,
    ChangeRole,
    ListAccounts,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::CreateAccount,
        Operation::DeleteAccount,
        Operation::ChangeRole,
        Operation::ListAccounts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateAccount => "create_account",
            Operation::DeleteAccount => "delete_account",
            Operation::ChangeRole => "change_role",
            Operation::ListAccounts => "list_accounts",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated caller with the role the provider currently reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: AccountId,
    pub role: Role,
}

impl Caller {
    pub fn new(id: impl Into<AccountId>, role: Role) -> Self {
        Self { id: id.into(), role }
    }
}

/// Caller plus requested operation; built per request and never stored
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationContext<'a> {
    pub caller: &'a Caller,
    pub operation: Operation,
}

impl<'a> AuthorizationContext<'a> {
    pub fn new(caller: &'a Caller, operation: Operation) -> Self {
        Self { caller, operation }
    }
}
