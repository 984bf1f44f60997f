use std::time::{Duration, Instant};

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tokio::task::spawn_blocking;

use super::PgClient;
use crate::{PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Migrations compiled into the binary from `./migrations`.
pub(crate) const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// Outcome of [`PgClientExt::run_pending_migrations`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Versions applied by this run, oldest first.
    pub applied: Vec<String>,
    pub duration: Duration,
}

impl MigrationReport {
    /// Returns `true` if the schema was already current.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }

    #[inline]
    pub fn last_applied(&self) -> Option<&str> {
        self.applied.last().map(String::as_str)
    }
}

/// Schema management on top of [`PgClient`].
pub trait PgClientExt {
    /// Applies every embedded migration the database has not seen yet.
    ///
    /// Safe to call on every start; an up-to-date schema yields an empty
    /// report.
    fn run_pending_migrations(&self) -> impl Future<Output = PgResult<MigrationReport>> + Send;
}

impl PgClientExt for PgClient {
    async fn run_pending_migrations(&self) -> PgResult<MigrationReport> {
        let started = Instant::now();
        let conn = self.get_pooled_connection().await?;

        // The harness is synchronous, so it runs on the blocking pool with
        // the connection moved in and handed back.
        let mut wrapper: AsyncConnectionWrapper<_> = conn.into();
        let outcome = spawn_blocking(move || {
            wrapper
                .run_pending_migrations(MIGRATIONS)
                .map(|versions| versions.iter().map(ToString::to_string).collect::<Vec<_>>())
        })
        .await
        .map_err(|e| PgError::Migration(e.into()))?;

        let duration = started.elapsed();
        let applied = outcome.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_MIGRATION,
                error = %e,
                elapsed = ?duration,
                "migration run failed"
            );
            PgError::Migration(e)
        })?;

        tracing::info!(
            target: TRACING_TARGET_MIGRATION,
            applied = applied.len(),
            elapsed = ?duration,
            "schema is up to date"
        );

        Ok(MigrationReport { applied, duration })
    }
}

#[cfg(test)]
mod tests {
    use diesel::migration::{Migration, MigrationSource};

    use super::*;

    #[test]
    fn migrations_are_embedded_in_order() -> anyhow::Result<()> {
        let migrations = MigrationSource::<diesel::pg::Pg>::migrations(&MIGRATIONS)
            .map_err(|e| anyhow::anyhow!(e))?;
        let names: Vec<_> = migrations.iter().map(|m| m.name().to_string()).collect();

        assert_eq!(names.len(), 4);
        assert!(names[0].starts_with("00000000000000"));
        assert!(names[3].contains("vacations"));
        Ok(())
    }

    #[test]
    fn report_accessors() {
        let report = MigrationReport::default();
        assert!(report.is_noop());
        assert_eq!(report.last_applied(), None);

        let report = MigrationReport {
            applied: vec!["20250115000001".into(), "20250115000003".into()],
            duration: Duration::from_millis(12),
        };
        assert_eq!(report.last_applied(), Some("20250115000003"));
    }
}
