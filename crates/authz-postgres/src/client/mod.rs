//! Pooled PostgreSQL client and embedded migrations.

mod hooks;
mod migrations;
mod pg_client;
mod pg_config;

use deadpool::managed::{Object, Pool};
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
pub use migrations::{MigrationReport, PgClientExt};
pub use pg_client::{PgClient, PgConn, PgPoolStatus};
pub use pg_config::PgConfig;

type ConnectionManager = AsyncDieselConnectionManager<AsyncPgConnection>;

pub(crate) type ConnectionPool = Pool<ConnectionManager>;

/// A connection checked out of the pool; it returns to the pool on drop.
pub type PooledConnection = Object<ConnectionManager>;
