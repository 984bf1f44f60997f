//! Connection setup and pool hooks.

use deadpool::managed::{HookResult, Metrics};
use diesel::ConnectionResult;
use diesel_async::pooled_connection::{PoolError, PoolableConnection};
use diesel_async::{AsyncConnection, AsyncPgConnection, SimpleAsyncConnection};
use futures::FutureExt;
use futures::future::BoxFuture;

use super::pg_config::redact;
use crate::TRACING_TARGET_CONNECTION;

/// Opens a connection and pins the session to UTC.
///
/// `timestamptz` values then round-trip unchanged; Tallinn calendar days are
/// computed in Rust and bound as parameters.
pub(super) fn establish(url: &str) -> BoxFuture<'_, ConnectionResult<AsyncPgConnection>> {
    async move {
        let mut conn = AsyncPgConnection::establish(url).await.inspect_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                url = %redact(url),
                error = %e,
                "could not open database connection"
            );
        })?;

        conn.batch_execute("SET TIME ZONE 'UTC'")
            .await
            .map_err(diesel::ConnectionError::CouldntSetupConfiguration)?;

        tracing::debug!(target: TRACING_TARGET_CONNECTION, "database connection opened");
        Ok(conn)
    }
    .boxed()
}

/// Logs connections that broke while idle or in use.
///
/// Broken connections are dropped by the manager on recycle; the hook only
/// makes them visible.
pub(super) fn report_broken(
    conn: &mut AsyncPgConnection,
    metrics: &Metrics,
) -> HookResult<PoolError> {
    if conn.is_broken() {
        tracing::warn!(
            target: TRACING_TARGET_CONNECTION,
            recycle_count = metrics.recycle_count,
            age = ?metrics.age(),
            "broken database connection in pool"
        );
    }

    Ok(())
}
