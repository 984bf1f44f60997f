//! Audit log events and their JetStream publisher.

mod audit_event;
mod audit_publisher;

pub use audit_event::{AuditEventType, AuditLogEvent, AuditObjectType};
pub use audit_publisher::{AUDIT_STREAM_NAME, AUDIT_SUBJECT_PREFIX, AuditLogPublisher};
