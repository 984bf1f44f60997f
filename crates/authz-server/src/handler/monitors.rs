//! Service health handler.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use authz_postgres::PgClient;
use axum::extract::State;
use axum::http::StatusCode;

use crate::extract::Json;
use crate::handler::Result;
use crate::handler::response::MonitorStatus;
use crate::service::{AuditLog, ServiceState};

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "authz_server::handler::monitors";

/// Reports the version, database pool figures and audit log connection.
#[tracing::instrument(skip_all)]
async fn health_status(
    State(postgres): State<PgClient>,
    State(audit_log): State<AuditLog>,
) -> Result<(StatusCode, Json<MonitorStatus>)> {
    let response = MonitorStatus::new(postgres.pool_status(), audit_log.is_connected());

    tracing::debug!(
        target: TRACING_TARGET,
        status = ?response.status,
        in_use = response.database.in_use,
        waiting = response.database.waiting,
        "health checked"
    );

    Ok((StatusCode::OK, Json(response)))
}

fn health_status_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get service health")
        .description("Reports `degraded` while requests queue for database connections or the audit log is disconnected. Always answers 200.")
        .response::<200, Json<MonitorStatus>>()
}

/// Returns a [`Router`] with the health route.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/health/", get_with(health_status, health_status_docs))
        .with_path_items(|item| item.tag("Monitors"))
}
