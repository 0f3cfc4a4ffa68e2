//! Value objects representing immutable domain concepts.

pub mod acknowledgement;
pub mod auth_response;

// Re-export commonly used types
pub use acknowledgement::Acknowledgement;
pub use auth_response::LoginResult;
