//! Route handlers
//!
//! - `accounts`: privileged account lifecycle under `/api/v1/admin`
//! - `auth`: credential login
//! - `health`: liveness for load balancers

pub mod accounts;
pub mod auth;
pub mod health;
