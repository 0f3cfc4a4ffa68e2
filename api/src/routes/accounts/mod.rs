//! Privileged account lifecycle handlers
//!
//! Every handler runs behind `JwtAuth`, so an `AuthContext` carrying the
//! caller's current role is always present. Authorization itself happens
//! in the gateway.

pub mod change_role;
pub mod create;
pub mod delete;
pub mod list;

pub use change_role::change_role;
pub use create::create_account;
pub use delete::delete_account;
pub use list::list_accounts;
