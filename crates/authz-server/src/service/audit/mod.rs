//! Best-effort audit logging of successful mutations.

mod audit_log;

pub use audit_log::{AuditLog, snapshot};
