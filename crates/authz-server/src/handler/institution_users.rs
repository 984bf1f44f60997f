//! Institution user handlers: membership management and lifecycle.
//!
//! Every write goes through [`LifecycleAction::check`] and, where the root
//! role may be lost, [`RootRoleGuard::check`] inside the same transaction as
//! the write.

use std::collections::HashSet;

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use authz_nats::audit::{AuditEventType, AuditLogEvent, AuditObjectType};
use authz_postgres::PgConnection;
use authz_postgres::model::{Role as RoleModel, UpdateInstitutionUser as UpdateModel};
use authz_postgres::query::{
    DepartmentRepository, InstitutionUserRepository, InstitutionUserWithRoles, RoleRepository,
    UserRepository,
};
use authz_postgres::types::{
    InstitutionUserStatus, LifecycleAction, OffsetPagination, PrivilegeKey, RootRoleGuard,
    check_activation_roles, check_deactivation_date, local_today, loses_root_role,
};
use axum::extract::State;
use axum::http::StatusCode;
use jiff::Timestamp;
use uuid::Uuid;
use validator::Validate;

use crate::extract::{AuthProvider, AuthState, Json, Path, PgPool, Query, ValidateJson};
use crate::handler::request::{
    ActivateInstitutionUser, CreateInstitutionUser, DeactivateInstitutionUser,
    InstitutionPathParams, InstitutionUserPathParams, ListInstitutionUsers, UpdateInstitutionUser,
};
use crate::handler::response::{
    ErrorResponse, InstitutionUser, InstitutionUsersPage, Page, ValidationErrorDetail,
};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{AuditLog, ServiceState, snapshot};

/// Tracing target for institution user operations.
const TRACING_TARGET: &str = "authz_server::handler::institution_users";

/// Loads a membership with its user and roles, or fails with `404`.
pub(crate) async fn find_member(
    conn: &mut PgConnection,
    institution_id: Uuid,
    institution_user_id: Uuid,
) -> Result<InstitutionUserWithRoles> {
    conn.find_institution_user_with_roles(institution_id, institution_user_id)
        .await?
        .ok_or_else(|| {
            ErrorKind::NotFound
                .with_message(format!("Institution user not found: {institution_user_id}"))
                .with_resource("institution_user")
        })
}

/// Loads the roles with the given ids, rejecting ids outside the institution.
pub(crate) async fn resolve_roles(
    conn: &mut PgConnection,
    institution_id: Uuid,
    role_ids: &[Uuid],
) -> Result<Vec<RoleModel>> {
    let mut unique: Vec<Uuid> = Vec::with_capacity(role_ids.len());
    let mut seen = HashSet::with_capacity(role_ids.len());
    for id in role_ids {
        if seen.insert(*id) {
            unique.push(*id);
        }
    }

    let roles = conn.find_roles_by_ids(institution_id, &unique).await?;
    if roles.len() == unique.len() {
        return Ok(roles);
    }

    let found: HashSet<Uuid> = roles.iter().map(|role| role.id).collect();
    let details = role_ids
        .iter()
        .enumerate()
        .filter(|(_, id)| !found.contains(id))
        .map(|(index, id)| {
            ValidationErrorDetail::new(
                format!("roleIds[{index}]"),
                "unknown_role",
                format!("Role {id} does not exist in this institution"),
            )
        })
        .collect();

    Err(ErrorKind::Validation
        .with_message("Unknown roles")
        .with_resource("role")
        .with_validation(details))
}

/// Rejects a department outside the institution.
async fn ensure_department(
    conn: &mut PgConnection,
    institution_id: Uuid,
    department_id: Option<Uuid>,
) -> Result<()> {
    let Some(department_id) = department_id else {
        return Ok(());
    };

    if conn
        .find_department(institution_id, department_id)
        .await?
        .is_none()
    {
        return Err(ErrorKind::Validation
            .with_message("Unknown department")
            .with_resource("department")
            .with_validation(vec![ValidationErrorDetail::new(
                "departmentId",
                "unknown_department",
                format!("Department {department_id} does not exist in this institution"),
            )]));
    }
    Ok(())
}

/// Checks `action` against the member's status and the root-holder guard.
///
/// `replacement` holds the roles about to replace the member's roles, if any.
/// The root role row stays locked until the transaction ends, so concurrent
/// requests against different root holders are checked one after another.
async fn check_lifecycle(
    conn: &mut PgConnection,
    member: &InstitutionUserWithRoles,
    action: LifecycleAction,
    replacement: Option<&[RoleModel]>,
) -> Result<()> {
    let institution_user = &member.institution_user;
    let status = institution_user.status();
    action.check(status, institution_user.has_scheduled_deactivation())?;

    let holds_root = member.roles.iter().any(|role| role.is_root);
    let loses_root = loses_root_role(
        holds_root,
        replacement.map(|roles| roles.iter().any(|role| role.is_root)),
    );

    if holds_root && (action.affects_root_holder() || loses_root) {
        conn.lock_root_role(institution_user.institution_id).await?;
        let others = conn
            .count_other_root_holders(institution_user.institution_id, institution_user.id)
            .await?;
        let guard = RootRoleGuard::new(
            holds_root,
            status == InstitutionUserStatus::Active,
            others,
        );
        guard.check(action, loses_root)?;
    }

    Ok(())
}

/// Lists the institution's members.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
    )
)]
async fn list_institution_users(
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionPathParams>,
    Query(query): Query<ListInstitutionUsers>,
    PgPool(mut conn): PgPool,
) -> Result<(StatusCode, Json<InstitutionUsersPage>)> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::ViewUser)?;
    query.validate()?;

    let (filter, pagination) = query.into_parts();
    let pagination = OffsetPagination::from(pagination);

    let page = conn
        .list_institution_users(path_params.institution_id, &filter, pagination, local_today())
        .await?;
    let page = Page::from_offset_page(page, pagination, InstitutionUser::from_joined);

    tracing::debug!(
        target: TRACING_TARGET,
        item_count = page.items.len(),
        total = ?page.total,
        "Institution users listed",
    );

    Ok((StatusCode::OK, Json(page)))
}

fn list_institution_users_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List institution users")
        .description(
            "Returns members filtered by status, department, role and a search term. \
             Statuses are evaluated for today in Europe/Tallinn.",
        )
        .response::<200, Json<InstitutionUsersPage>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Adds a person to the institution.
///
/// The person is looked up by personal identification code and created when
/// unknown. A person with a non-archived membership cannot be added again.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
    )
)]
async fn create_institution_user(
    State(audit_log): State<AuditLog>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionPathParams>,
    PgPool(mut conn): PgPool,
    ValidateJson(request): ValidateJson<CreateInstitutionUser>,
) -> Result<(StatusCode, Json<InstitutionUser>)> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::AddUser)?;
    tracing::debug!(target: TRACING_TARGET, "Creating institution user");

    let institution_id = path_params.institution_id;
    let member = conn
        .transaction(|conn| {
            Box::pin(async move {
                ensure_department(conn, institution_id, request.department_id).await?;
                let roles = resolve_roles(conn, institution_id, &request.role_ids).await?;

                let user = match conn
                    .find_user_by_pic(&request.personal_identification_code)
                    .await?
                {
                    Some(user) => user,
                    None => conn.create_user(request.to_new_user()).await?,
                };

                if conn
                    .find_unarchived_membership(institution_id, user.id)
                    .await?
                    .is_some()
                {
                    return Err(ErrorKind::Conflict
                        .with_message("This person already belongs to the institution")
                        .with_resource("institution_user"));
                }

                let institution_user = conn
                    .create_institution_user(
                        request.to_new_institution_user(institution_id, user.id),
                    )
                    .await?;
                let role_ids: Vec<Uuid> = roles.iter().map(|role| role.id).collect();
                conn.replace_institution_user_roles(institution_user.id, &role_ids)
                    .await?;

                Ok::<_, Error>(InstitutionUserWithRoles {
                    institution_user,
                    user,
                    roles,
                })
            })
        })
        .await?;

    let response = InstitutionUser::from_joined(member);

    tracing::info!(
        target: TRACING_TARGET,
        institution_user_id = %response.institution_user_id,
        "Institution user created",
    );

    let event = AuditLogEvent::new(
        AuditEventType::CreateUser,
        AuditObjectType::InstitutionUser,
        response.institution_user_id,
    )
    .with_institution(institution_id)
    .with_post(snapshot(&response));
    audit_log.record(&auth_state, event).await;

    Ok((StatusCode::CREATED, Json(response)))
}

fn create_institution_user_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create institution user")
        .description(
            "Adds a person to the institution, creating the person when the \
             personal identification code is unknown.",
        )
        .response::<201, Json<InstitutionUser>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Returns a member. Members may always read their own membership.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
        institution_user_id = %path_params.institution_user_id,
    )
)]
async fn read_institution_user(
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionUserPathParams>,
    PgPool(mut conn): PgPool,
) -> Result<(StatusCode, Json<InstitutionUser>)> {
    auth_state.authorize_self_or_privilege(
        path_params.institution_id,
        path_params.institution_user_id,
        PrivilegeKey::ViewUser,
    )?;

    let member = find_member(
        &mut conn,
        path_params.institution_id,
        path_params.institution_user_id,
    )
    .await?;

    tracing::debug!(target: TRACING_TARGET, "Institution user read");

    Ok((StatusCode::OK, Json(InstitutionUser::from_joined(member))))
}

fn read_institution_user_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get institution user")
        .description("Returns a member with their roles and derived status.")
        .response::<200, Json<InstitutionUser>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Edits member details and, optionally, replaces their roles.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
        institution_user_id = %path_params.institution_user_id,
    )
)]
async fn update_institution_user(
    State(audit_log): State<AuditLog>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionUserPathParams>,
    PgPool(mut conn): PgPool,
    ValidateJson(request): ValidateJson<UpdateInstitutionUser>,
) -> Result<(StatusCode, Json<InstitutionUser>)> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::EditUser)?;
    tracing::debug!(target: TRACING_TARGET, "Updating institution user");

    let InstitutionUserPathParams {
        institution_id,
        institution_user_id,
    } = path_params;

    let (before, after) = conn
        .transaction(|conn| {
            Box::pin(async move {
                let member = find_member(conn, institution_id, institution_user_id).await?;

                let roles = match &request.role_ids {
                    Some(role_ids) => Some(resolve_roles(conn, institution_id, role_ids).await?),
                    None => None,
                };
                check_lifecycle(conn, &member, LifecycleAction::Update, roles.as_deref()).await?;
                ensure_department(conn, institution_id, request.department_id.flatten()).await?;

                let user_changes = request.to_user_model();
                if !user_changes.is_empty() {
                    conn.update_user(member.user.id, user_changes).await?;
                }

                conn.update_institution_user(institution_user_id, request.to_model())
                    .await?;

                if let Some(roles) = &roles {
                    let role_ids: Vec<Uuid> = roles.iter().map(|role| role.id).collect();
                    conn.replace_institution_user_roles(institution_user_id, &role_ids)
                        .await?;
                }

                let updated = find_member(conn, institution_id, institution_user_id).await?;
                Ok::<_, Error>((member, updated))
            })
        })
        .await?;

    let before = InstitutionUser::from_joined(before);
    let response = InstitutionUser::from_joined(after);

    tracing::info!(target: TRACING_TARGET, "Institution user updated");

    let event = AuditLogEvent::new(
        AuditEventType::ModifyUser,
        AuditObjectType::InstitutionUser,
        institution_user_id,
    )
    .with_institution(institution_id)
    .with_pre(snapshot(&before))
    .with_post(snapshot(&response));
    audit_log.record(&auth_state, event).await;

    Ok((StatusCode::OK, Json(response)))
}

fn update_institution_user_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update institution user")
        .description(
            "Edits member details. `roleIds` replaces the assigned roles. Archived \
             members are read-only, and the only active root holder cannot lose the root role.",
        )
        .response::<200, Json<InstitutionUser>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Soft deletes a membership.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
        institution_user_id = %path_params.institution_user_id,
    )
)]
async fn delete_institution_user(
    State(audit_log): State<AuditLog>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionUserPathParams>,
    PgPool(mut conn): PgPool,
) -> Result<StatusCode> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::ArchiveUser)?;
    tracing::debug!(target: TRACING_TARGET, "Deleting institution user");

    let InstitutionUserPathParams {
        institution_id,
        institution_user_id,
    } = path_params;

    let member = conn
        .transaction(|conn| {
            Box::pin(async move {
                let member = find_member(conn, institution_id, institution_user_id).await?;
                check_lifecycle(conn, &member, LifecycleAction::Delete, None).await?;
                conn.delete_institution_user(institution_user_id).await?;
                Ok::<_, Error>(member)
            })
        })
        .await?;

    tracing::info!(target: TRACING_TARGET, "Institution user deleted");

    let event = AuditLogEvent::new(
        AuditEventType::RemoveUser,
        AuditObjectType::InstitutionUser,
        institution_user_id,
    )
    .with_institution(institution_id)
    .with_pre(snapshot(&InstitutionUser::from_joined(member)));
    audit_log.record(&auth_state, event).await;

    Ok(StatusCode::NO_CONTENT)
}

fn delete_institution_user_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete institution user")
        .description("Soft deletes a membership. The only active root holder cannot be deleted.")
        .response::<204, ()>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Sets the deactivation date of a member.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
        institution_user_id = %path_params.institution_user_id,
    )
)]
async fn deactivate_institution_user(
    State(audit_log): State<AuditLog>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionUserPathParams>,
    PgPool(mut conn): PgPool,
    ValidateJson(request): ValidateJson<DeactivateInstitutionUser>,
) -> Result<(StatusCode, Json<InstitutionUser>)> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::DeactivateUser)?;
    check_deactivation_date(request.deactivation_date, local_today())?;
    tracing::debug!(target: TRACING_TARGET, "Deactivating institution user");

    let InstitutionUserPathParams {
        institution_id,
        institution_user_id,
    } = path_params;
    let deactivation_date = request.deactivation_date;

    let (before, after) = conn
        .transaction(|conn| {
            Box::pin(async move {
                let member = find_member(conn, institution_id, institution_user_id).await?;
                check_lifecycle(conn, &member, LifecycleAction::Deactivate, None).await?;

                let changes = UpdateModel {
                    deactivation_date: Some(Some(deactivation_date.into())),
                    ..Default::default()
                };
                conn.update_institution_user(institution_user_id, changes)
                    .await?;

                let updated = find_member(conn, institution_id, institution_user_id).await?;
                Ok::<_, Error>((member, updated))
            })
        })
        .await?;

    let before = InstitutionUser::from_joined(before);
    let response = InstitutionUser::from_joined(after);

    tracing::info!(
        target: TRACING_TARGET,
        deactivation_date = %deactivation_date,
        status = %response.status,
        "Institution user deactivated",
    );

    let event = AuditLogEvent::new(
        AuditEventType::DeactivateUser,
        AuditObjectType::InstitutionUser,
        institution_user_id,
    )
    .with_institution(institution_id)
    .with_pre(snapshot(&before))
    .with_post(snapshot(&response));
    audit_log.record(&auth_state, event).await;

    Ok((StatusCode::OK, Json(response)))
}

fn deactivate_institution_user_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Deactivate institution user")
        .description(
            "Sets the deactivation date, which must be today or later in Europe/Tallinn. \
             A future date schedules the deactivation.",
        )
        .response::<200, Json<InstitutionUser>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Clears the deactivation date of a member and assigns roles.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
        institution_user_id = %path_params.institution_user_id,
    )
)]
async fn activate_institution_user(
    State(audit_log): State<AuditLog>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionUserPathParams>,
    PgPool(mut conn): PgPool,
    ValidateJson(request): ValidateJson<ActivateInstitutionUser>,
) -> Result<(StatusCode, Json<InstitutionUser>)> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::ActivateUser)?;
    check_activation_roles(&request.role_ids)?;
    tracing::debug!(target: TRACING_TARGET, "Activating institution user");

    let InstitutionUserPathParams {
        institution_id,
        institution_user_id,
    } = path_params;

    let (before, after) = conn
        .transaction(|conn| {
            Box::pin(async move {
                let member = find_member(conn, institution_id, institution_user_id).await?;
                let roles = resolve_roles(conn, institution_id, &request.role_ids).await?;
                check_lifecycle(conn, &member, LifecycleAction::Activate, Some(roles.as_slice())).await?;

                let changes = UpdateModel {
                    deactivation_date: Some(None),
                    ..Default::default()
                };
                conn.update_institution_user(institution_user_id, changes)
                    .await?;

                let role_ids: Vec<Uuid> = roles.iter().map(|role| role.id).collect();
                conn.replace_institution_user_roles(institution_user_id, &role_ids)
                    .await?;

                let updated = find_member(conn, institution_id, institution_user_id).await?;
                Ok::<_, Error>((member, updated))
            })
        })
        .await?;

    let before = InstitutionUser::from_joined(before);
    let response = InstitutionUser::from_joined(after);

    tracing::info!(target: TRACING_TARGET, "Institution user activated");

    let event = AuditLogEvent::new(
        AuditEventType::ActivateUser,
        AuditObjectType::InstitutionUser,
        institution_user_id,
    )
    .with_institution(institution_id)
    .with_pre(snapshot(&before))
    .with_post(snapshot(&response));
    audit_log.record(&auth_state, event).await;

    Ok((StatusCode::OK, Json(response)))
}

fn activate_institution_user_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Activate institution user")
        .description(
            "Clears the deactivation date and replaces the roles. At least one role is \
             required, and the only lasting root holder cannot lose the root role.",
        )
        .response::<200, Json<InstitutionUser>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Archives a member and removes all role assignments.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
        institution_user_id = %path_params.institution_user_id,
    )
)]
async fn archive_institution_user(
    State(audit_log): State<AuditLog>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionUserPathParams>,
    PgPool(mut conn): PgPool,
) -> Result<(StatusCode, Json<InstitutionUser>)> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::ArchiveUser)?;
    tracing::debug!(target: TRACING_TARGET, "Archiving institution user");

    let InstitutionUserPathParams {
        institution_id,
        institution_user_id,
    } = path_params;

    let (before, after) = conn
        .transaction(|conn| {
            Box::pin(async move {
                let member = find_member(conn, institution_id, institution_user_id).await?;
                check_lifecycle(conn, &member, LifecycleAction::Archive, None).await?;

                let changes = UpdateModel {
                    archived_at: Some(Some(Timestamp::now().into())),
                    ..Default::default()
                };
                conn.update_institution_user(institution_user_id, changes)
                    .await?;
                conn.remove_institution_user_roles(institution_user_id)
                    .await?;

                let updated = find_member(conn, institution_id, institution_user_id).await?;
                Ok::<_, Error>((member, updated))
            })
        })
        .await?;

    let before = InstitutionUser::from_joined(before);
    let response = InstitutionUser::from_joined(after);

    tracing::info!(target: TRACING_TARGET, "Institution user archived");

    let event = AuditLogEvent::new(
        AuditEventType::ArchiveUser,
        AuditObjectType::InstitutionUser,
        institution_user_id,
    )
    .with_institution(institution_id)
    .with_pre(snapshot(&before))
    .with_post(snapshot(&response));
    audit_log.record(&auth_state, event).await;

    Ok((StatusCode::OK, Json(response)))
}

fn archive_institution_user_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Archive institution user")
        .description(
            "Archives the membership and removes all roles. Archived members are read-only.",
        )
        .response::<200, Json<InstitutionUser>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with all institution user routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/institutions/{institutionId}/users/",
            get_with(list_institution_users, list_institution_users_docs)
                .post_with(create_institution_user, create_institution_user_docs),
        )
        .api_route(
            "/institutions/{institutionId}/users/{institutionUserId}/",
            get_with(read_institution_user, read_institution_user_docs)
                .patch_with(update_institution_user, update_institution_user_docs)
                .delete_with(delete_institution_user, delete_institution_user_docs),
        )
        .api_route(
            "/institutions/{institutionId}/users/{institutionUserId}/deactivate/",
            post_with(deactivate_institution_user, deactivate_institution_user_docs),
        )
        .api_route(
            "/institutions/{institutionId}/users/{institutionUserId}/activate/",
            post_with(activate_institution_user, activate_institution_user_docs),
        )
        .api_route(
            "/institutions/{institutionId}/users/{institutionUserId}/archive/",
            post_with(archive_institution_user, archive_institution_user_docs),
        )
        .with_path_items(|item| item.tag("Institution users"))
}
