//! Audit log repository module.

mod r#trait;
pub use r#trait::AuditLogRepository;

mod noop;
pub use noop::NoOpAuditLogRepository;

mod event_log;
pub use event_log::{TracingAuditLogRepository, AUDIT_TARGET};

mod memory;
pub use memory::InMemoryAuditLogRepository;

#[cfg(test)]
mod tests;
