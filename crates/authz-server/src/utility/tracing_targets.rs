//! Tracing targets shared across modules.
//!
//! Handlers declare their own `TRACING_TARGET` next to the routes; the
//! targets here cross module boundaries. Filter them with
//! `RUST_LOG=authz_server::authorization=debug` and similar.

/// Bearer token decoding and claim checks.
pub const TRACING_TARGET_AUTHENTICATION: &str = "authz_server::authentication";

/// Tenant scope and privilege checks.
pub const TRACING_TARGET_AUTHORIZATION: &str = "authz_server::authorization";

/// Failed requests, logged once when the error is rendered.
pub const TRACING_TARGET_HANDLER_ERROR: &str = "authz_server::handler::error";

/// Middleware errors such as timeouts.
pub const TRACING_TARGET_RECOVERY_ERROR: &str = "authz_server::recovery::error";

/// Handler panics caught by the recovery layer.
pub const TRACING_TARGET_RECOVERY_PANIC: &str = "authz_server::recovery::panic";

/// Loading of the realm public key or the shared secret.
pub const TRACING_TARGET_AUTH_KEYS: &str = "authz_server::auth_keys";

/// Audit event publication.
pub const TRACING_TARGET_AUDIT: &str = "authz_server::audit";

/// Service assembly: database, NATS and key setup.
pub const TRACING_TARGET_SERVICE: &str = "authz_server::service";

/// Request spans and slow request reports.
pub const TRACING_TARGET_REQUEST: &str = "authz_server::request";
