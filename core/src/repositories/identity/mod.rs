//! Identity provider port and its in-memory implementation.

mod r#trait;
pub use r#trait::IdentityProvider;

mod memory;
pub use memory::InMemoryIdentityProvider;
