//! Health report.

use authz_postgres::PgPoolStatus;
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Overall verdict of a health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Healthy,
    /// Requests queue for database connections or audit events cannot be published.
    Degraded,
}

/// Database connection pool usage.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStatus {
    pub capacity: usize,
    pub open: usize,
    pub in_use: usize,
    /// Requests waiting for a connection.
    pub waiting: usize,
    pub saturated: bool,
}

impl From<PgPoolStatus> for DatabaseStatus {
    fn from(pool: PgPoolStatus) -> Self {
        Self {
            capacity: pool.max_size,
            open: pool.size,
            in_use: pool.size.saturating_sub(pool.available),
            waiting: pool.waiting,
            saturated: pool.is_saturated(),
        }
    }
}

/// Body of `GET /health/`.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
    pub status: Health,
    pub version: String,
    pub checked_at: Timestamp,
    pub database: DatabaseStatus,
    /// Absent when audit events are only logged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_log_connected: Option<bool>,
}

impl MonitorStatus {
    pub fn new(pool: PgPoolStatus, audit_log_connected: Option<bool>) -> Self {
        let database = DatabaseStatus::from(pool);
        let status = if database.saturated || audit_log_connected == Some(false) {
            Health::Degraded
        } else {
            Health::Healthy
        };

        Self {
            status,
            version: env!("CARGO_PKG_VERSION").to_owned(),
            checked_at: Timestamp::now(),
            database,
            audit_log_connected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(size: usize, available: usize, waiting: usize) -> PgPoolStatus {
        PgPoolStatus {
            max_size: 4,
            size,
            available,
            waiting,
        }
    }

    #[test]
    fn idle_pool_is_healthy() {
        let status = MonitorStatus::new(pool(2, 2, 0), None);
        assert_eq!(status.status, Health::Healthy);
        assert_eq!(status.database.in_use, 0);
    }

    #[test]
    fn queueing_or_lost_audit_log_degrades() {
        let queueing = MonitorStatus::new(pool(4, 0, 3), Some(true));
        assert_eq!(queueing.status, Health::Degraded);
        assert_eq!(queueing.database.in_use, 4);

        let disconnected = MonitorStatus::new(pool(1, 1, 0), Some(false));
        assert_eq!(disconnected.status, Health::Degraded);
    }
}
