//! Privilege catalog handler.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use authz_postgres::query::PrivilegeRepository;
use axum::http::StatusCode;

use crate::extract::{AuthState, Json, PgPool};
use crate::handler::Result;
use crate::handler::response::{ErrorResponse, Privilege};
use crate::service::ServiceState;

/// Tracing target for privilege operations.
const TRACING_TARGET: &str = "authz_server::handler::privileges";

/// Lists the fixed privilege catalog.
#[tracing::instrument(skip_all, fields(subject = %auth_state.subject))]
async fn list_privileges(
    AuthState(auth_state): AuthState,
    PgPool(mut conn): PgPool,
) -> Result<(StatusCode, Json<Vec<Privilege>>)> {
    let privileges = Privilege::from_models(conn.list_privileges().await?);

    tracing::debug!(
        target: TRACING_TARGET,
        privilege_count = privileges.len(),
        "Privileges listed",
    );

    Ok((StatusCode::OK, Json(privileges)))
}

fn list_privileges_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List privileges")
        .description("Returns every privilege that can be granted to a role.")
        .response::<200, Json<Vec<Privilege>>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with the privilege catalog route.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/privileges/", get_with(list_privileges, list_privileges_docs))
        .with_path_items(|item| item.tag("Privileges"))
}
