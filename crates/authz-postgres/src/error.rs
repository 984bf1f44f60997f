//! Errors of database operations.
//!
//! See [`PgError`]. The raw Diesel and pool errors are re-exported for
//! callers that run their own transactions.

pub use deadpool::managed::TimeoutType;
pub use diesel::result::{ConnectionError as DieselConnectionError, Error as DieselError};
pub use diesel_async::pooled_connection::PoolError as DieselPoolError;
pub use diesel_async::pooled_connection::deadpool::PoolError as DeadpoolError;

use crate::TRACING_TARGET_CONNECTION;
use crate::types::ConstraintViolation;

/// Boxed error source.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a database operation.
#[derive(Debug, thiserror::Error)]
#[must_use = "database errors should be handled appropriately"]
pub enum PgError {
    /// The connection settings are invalid.
    #[error("invalid database configuration: {0}")]
    Config(String),

    /// No connection became available in time.
    #[error("timed out while {} a database connection", timeout_action(.0))]
    Timeout(TimeoutType),

    /// A connection could not be opened or was lost.
    #[error("database connection failed: {0}")]
    Connection(#[from] DieselConnectionError),

    /// Applying the embedded migrations failed.
    #[error("database migration failed: {0}")]
    Migration(BoxError),

    /// A statement failed, including constraint violations and missing rows.
    #[error("database query failed: {0}")]
    Query(#[from] DieselError),

    /// The pool itself is unusable.
    #[error("connection pool failure: {0}")]
    Pool(String),
}

fn timeout_action(timeout: &TimeoutType) -> &'static str {
    match timeout {
        TimeoutType::Wait => "waiting for",
        TimeoutType::Create => "opening",
        TimeoutType::Recycle => "recycling",
    }
}

impl PgError {
    /// Returns the name of the violated constraint, if any.
    pub fn constraint(&self) -> Option<&str> {
        match self {
            Self::Query(DieselError::DatabaseError(_, info)) => info.constraint_name(),
            _ => None,
        }
    }

    /// Returns the violated constraint as a typed value.
    pub fn constraint_violation(&self) -> Option<ConstraintViolation> {
        self.constraint().and_then(ConstraintViolation::new)
    }

    /// Returns whether the query matched no row.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Query(DieselError::NotFound))
    }

    /// Returns whether the database could not be reached.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Connection(_))
    }
}

impl From<DeadpoolError> for PgError {
    fn from(error: DeadpoolError) -> Self {
        match error {
            DeadpoolError::Timeout(timeout) => Self::Timeout(timeout),
            DeadpoolError::Backend(DieselPoolError::ConnectionError(e)) => Self::Connection(e),
            DeadpoolError::Backend(DieselPoolError::QueryError(e)) => Self::Query(e),
            DeadpoolError::Closed => Self::Pool("the pool is closed".to_owned()),
            DeadpoolError::NoRuntimeSpecified => Self::Pool("no async runtime".to_owned()),
            DeadpoolError::PostCreateHook(e) => {
                tracing::warn!(target: TRACING_TARGET_CONNECTION, error = %e, "post-create hook failed");
                Self::Pool(e.to_string())
            }
        }
    }
}

/// Specialized [`Result`] type for database operations.
pub type PgResult<T, E = PgError> = Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_row_is_not_found() {
        let error = PgError::from(DieselError::NotFound);
        assert!(error.is_not_found());
        assert!(!error.is_unavailable());
        assert!(error.constraint().is_none());
    }

    #[test]
    fn pool_timeout_is_unavailable() {
        let error = PgError::Timeout(TimeoutType::Wait);
        assert!(error.is_unavailable());
        assert_eq!(
            error.to_string(),
            "timed out while waiting for a database connection"
        );
    }

    #[test]
    fn closed_pool_is_a_pool_failure() {
        let error = PgError::from(DeadpoolError::Closed);
        assert!(matches!(error, PgError::Pool(_)));
    }
}
