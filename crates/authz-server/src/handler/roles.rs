//! Role handlers.
//!
//! The root role of an institution is created with the institution and holds
//! every privilege. It cannot be edited or deleted.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use authz_nats::audit::{AuditEventType, AuditLogEvent, AuditObjectType};
use authz_postgres::PgConn;
use authz_postgres::model::Role as RoleModel;
use authz_postgres::query::RoleRepository;
use authz_postgres::types::PrivilegeKey;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use crate::extract::{AuthProvider, AuthState, Json, Path, PgPool, ValidateJson};
use crate::handler::request::{CreateRole, InstitutionPathParams, RolePathParams, UpdateRole};
use crate::handler::response::{ErrorResponse, Role};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{AuditLog, ServiceState, snapshot};

/// Tracing target for role operations.
const TRACING_TARGET: &str = "authz_server::handler::roles";

/// Lists the roles of the institution with their privileges.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
    )
)]
async fn list_roles(
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionPathParams>,
    PgPool(mut conn): PgPool,
) -> Result<(StatusCode, Json<Vec<Role>>)> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::ViewRole)?;

    let roles = Role::from_models(conn.list_roles(path_params.institution_id).await?);

    tracing::debug!(
        target: TRACING_TARGET,
        role_count = roles.len(),
        "Roles listed",
    );

    Ok((StatusCode::OK, Json(roles)))
}

fn list_roles_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List roles")
        .description("Returns the roles of the institution with their privileges.")
        .response::<200, Json<Vec<Role>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Creates a role with the requested privileges.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
    )
)]
async fn create_role(
    State(audit_log): State<AuditLog>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionPathParams>,
    PgPool(mut conn): PgPool,
    ValidateJson(request): ValidateJson<CreateRole>,
) -> Result<(StatusCode, Json<Role>)> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::AddRole)?;
    tracing::debug!(target: TRACING_TARGET, "Creating role");

    let new_role = request.into_model(path_params.institution_id);
    let privileges = request.privileges;

    let (role, privileges) = conn
        .transaction(|conn| {
            Box::pin(async move {
                let role = conn.create_role(new_role).await?;
                let privileges = conn.replace_role_privileges(role.id, &privileges).await?;
                Ok::<(RoleModel, Vec<PrivilegeKey>), Error>((role, privileges))
            })
        })
        .await?;

    let response = Role::from_model(role, privileges);

    tracing::info!(
        target: TRACING_TARGET,
        role_id = %response.role_id,
        privilege_count = response.privileges.len(),
        "Role created",
    );

    let event = AuditLogEvent::new(
        AuditEventType::CreateRole,
        AuditObjectType::Role,
        response.role_id,
    )
    .with_institution(path_params.institution_id)
    .with_post(snapshot(&response));
    audit_log.record(&auth_state, event).await;

    Ok((StatusCode::CREATED, Json(response)))
}

fn create_role_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create role")
        .description("Creates a role. Names are unique within the institution.")
        .response::<201, Json<Role>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Returns a role with its privileges.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
        role_id = %path_params.role_id,
    )
)]
async fn read_role(
    AuthState(auth_state): AuthState,
    Path(path_params): Path<RolePathParams>,
    PgPool(mut conn): PgPool,
) -> Result<(StatusCode, Json<Role>)> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::ViewRole)?;

    let role = find_role(&mut conn, path_params.institution_id, path_params.role_id).await?;
    let privileges = conn.list_role_privileges(role.id).await?;

    tracing::debug!(target: TRACING_TARGET, "Role read");

    Ok((StatusCode::OK, Json(Role::from_model(role, privileges))))
}

fn read_role_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get role")
        .description("Returns a role with its privileges.")
        .response::<200, Json<Role>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Renames a role or replaces its privileges.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
        role_id = %path_params.role_id,
    )
)]
async fn update_role(
    State(audit_log): State<AuditLog>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<RolePathParams>,
    PgPool(mut conn): PgPool,
    ValidateJson(request): ValidateJson<UpdateRole>,
) -> Result<(StatusCode, Json<Role>)> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::EditRole)?;
    tracing::debug!(target: TRACING_TARGET, "Updating role");

    let role = find_role(&mut conn, path_params.institution_id, path_params.role_id).await?;
    ensure_not_root(&role)?;

    let current_privileges = conn.list_role_privileges(role.id).await?;
    let current = Role::from_model(role.clone(), current_privileges.clone());

    if request.is_empty() {
        return Ok((StatusCode::OK, Json(current)));
    }

    let changes = request.to_model();
    let privileges = request.privileges;
    let institution_id = path_params.institution_id;

    let (role, privileges) = conn
        .transaction(|conn| {
            Box::pin(async move {
                let role = if changes.name.is_some() {
                    conn.update_role(institution_id, role.id, changes).await?
                } else {
                    role
                };
                let privileges = match privileges {
                    Some(keys) => conn.replace_role_privileges(role.id, &keys).await?,
                    None => current_privileges,
                };
                Ok::<(RoleModel, Vec<PrivilegeKey>), Error>((role, privileges))
            })
        })
        .await?;

    let response = Role::from_model(role, privileges);

    tracing::info!(target: TRACING_TARGET, "Role updated");

    let event = AuditLogEvent::new(
        AuditEventType::ModifyRole,
        AuditObjectType::Role,
        response.role_id,
    )
    .with_institution(path_params.institution_id)
    .with_pre(snapshot(&current))
    .with_post(snapshot(&response));
    audit_log.record(&auth_state, event).await;

    Ok((StatusCode::OK, Json(response)))
}

fn update_role_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update role")
        .description(
            "Renames a role or replaces its privilege set. The root role cannot be changed.",
        )
        .response::<200, Json<Role>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Soft deletes a role and removes its assignments.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
        role_id = %path_params.role_id,
    )
)]
async fn delete_role(
    State(audit_log): State<AuditLog>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<RolePathParams>,
    PgPool(mut conn): PgPool,
) -> Result<StatusCode> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::DeleteRole)?;
    tracing::debug!(target: TRACING_TARGET, "Deleting role");

    let role = find_role(&mut conn, path_params.institution_id, path_params.role_id).await?;
    ensure_not_root(&role)?;

    let privileges = conn.list_role_privileges(role.id).await?;
    let current = Role::from_model(role, privileges);

    let institution_id = path_params.institution_id;
    let role_id = path_params.role_id;
    conn.transaction(|conn| {
        Box::pin(async move {
            conn.delete_role(institution_id, role_id).await?;
            Ok::<(), Error>(())
        })
    })
    .await?;

    tracing::info!(target: TRACING_TARGET, "Role deleted");

    let event = AuditLogEvent::new(AuditEventType::RemoveRole, AuditObjectType::Role, role_id)
        .with_institution(institution_id)
        .with_pre(snapshot(&current));
    audit_log.record(&auth_state, event).await;

    Ok(StatusCode::NO_CONTENT)
}

fn delete_role_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete role")
        .description("Soft deletes a role and removes it from every member. The root role cannot be deleted.")
        .response::<204, ()>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

fn ensure_not_root(role: &RoleModel) -> Result<()> {
    if role.is_root {
        tracing::warn!(
            target: TRACING_TARGET,
            role_id = %role.id,
            "Rejected change to the root role"
        );
        return Err(ErrorKind::Conflict
            .with_message("The root role cannot be changed or deleted")
            .with_resource("role"));
    }
    Ok(())
}

async fn find_role(conn: &mut PgConn, institution_id: Uuid, role_id: Uuid) -> Result<RoleModel> {
    conn.find_role(institution_id, role_id).await?.ok_or_else(|| {
        ErrorKind::NotFound
            .with_message(format!("Role not found: {role_id}"))
            .with_resource("role")
    })
}

/// Returns a [`Router`] with all role routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/institutions/{institutionId}/roles/",
            get_with(list_roles, list_roles_docs).post_with(create_role, create_role_docs),
        )
        .api_route(
            "/institutions/{institutionId}/roles/{roleId}/",
            get_with(read_role, read_role_docs)
                .patch_with(update_role, update_role_docs)
                .delete_with(delete_role, delete_role_docs),
        )
        .with_path_items(|item| item.tag("Roles"))
}
