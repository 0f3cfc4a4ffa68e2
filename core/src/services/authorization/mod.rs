//! Authorization Decision Point

mod policy;

pub use policy::{is_permitted, PermissionPolicy, DEFAULT_GRANTS};
