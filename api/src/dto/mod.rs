pub mod accounts;
pub mod auth;

pub use accounts::{
    AccountListResponse, AccountResponse, ChangeRoleRequest, CreateAccountRequest,
    DeleteAccountRequest, ListAccountsQuery,
};
pub use auth::LoginRequest;
