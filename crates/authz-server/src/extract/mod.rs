//! Request extractors used by the HTTP handlers.
//!
//! - [`AuthHeader`], [`AuthClaims`] and [`AuthState`] verify the Keycloak
//!   access token and expose its claims.
//! - [`AuthProvider`] carries the tenant and privilege policies.
//! - [`Json`], [`ValidateJson`], [`Path`], [`Query`] and [`Multipart`] wrap
//!   their axum counterparts with client-friendly rejections.
//! - [`PgPool`] acquires a pooled database connection.

pub mod auth;
mod pg_connection;
pub mod reject;

pub use crate::extract::auth::{
    AuthClaims, AuthHeader, AuthProvider, AuthState, AuthzClaim, RealmAccess,
    SelectedInstitution,
};
pub use crate::extract::pg_connection::PgPool;
pub use crate::extract::reject::{Json, Multipart, Path, Query, ValidateJson};
