#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Pool setup, connection hooks and statements.
pub const TRACING_TARGET_CONNECTION: &str = "authz_postgres::connection";

/// Embedded migration runs.
pub const TRACING_TARGET_MIGRATION: &str = "authz_postgres::migrations";

/// Domain rules evaluated next to the data, such as the Tallinn calendar.
pub const TRACING_TARGET_DOMAIN: &str = "authz_postgres::domain";

mod client;
pub mod error;
pub mod model;
pub mod query;
mod schema;
pub mod types;

pub use diesel_async::AsyncPgConnection as PgConnection;

pub use crate::client::{
    MigrationReport, PgClient, PgClientExt, PgConfig, PgConn, PgPoolStatus, PooledConnection,
};
pub use crate::error::{PgError, PgResult};
