//! Institution handlers.
//!
//! Institutions are created by realm administrators together with their root
//! role. Members see the institutions where they hold an active membership.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use authz_nats::audit::{AuditEventType, AuditLogEvent, AuditObjectType};
use authz_postgres::model::{Institution as InstitutionModel, NewRole};
use authz_postgres::PgConn;
use authz_postgres::query::{InstitutionRepository, RoleRepository};
use authz_postgres::types::{PrivilegeKey, local_today};
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use crate::extract::{AuthProvider, AuthState, Json, Path, PgPool, ValidateJson};
use crate::handler::request::{CreateInstitution, InstitutionPathParams, UpdateInstitution};
use crate::handler::response::{ErrorResponse, Institution};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{AuditLog, ServiceState, snapshot};

/// Tracing target for institution operations.
const TRACING_TARGET: &str = "authz_server::handler::institutions";

/// Lists institutions where the caller has an active membership.
#[tracing::instrument(skip_all, fields(subject = %auth_state.subject))]
async fn list_institutions(
    AuthState(auth_state): AuthState,
    PgPool(mut conn): PgPool,
) -> Result<(StatusCode, Json<Vec<Institution>>)> {
    let pic = auth_state.personal_identification_code();
    let institutions = conn.list_institutions_for_pic(pic, local_today()).await?;
    let institutions = Institution::from_models(institutions);

    tracing::debug!(
        target: TRACING_TARGET,
        institution_count = institutions.len(),
        "Institutions listed",
    );

    Ok((StatusCode::OK, Json(institutions)))
}

fn list_institutions_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List own institutions")
        .description("Returns the institutions where the caller has an active membership.")
        .response::<200, Json<Vec<Institution>>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Creates an institution together with its root role.
///
/// The root role is granted every privilege. Both rows are written in one
/// transaction.
#[tracing::instrument(skip_all, fields(subject = %auth_state.subject))]
async fn create_institution(
    State(audit_log): State<AuditLog>,
    AuthState(auth_state): AuthState,
    PgPool(mut conn): PgPool,
    ValidateJson(request): ValidateJson<CreateInstitution>,
) -> Result<(StatusCode, Json<Institution>)> {
    auth_state.authorize_admin()?;
    tracing::debug!(target: TRACING_TARGET, "Creating institution");

    let new_institution = request.into_model();
    let institution = conn
        .transaction(|conn| {
            Box::pin(async move {
                let institution = conn.create_institution(new_institution).await?;
                let root_role = conn.create_role(NewRole::root(institution.id)).await?;
                conn.replace_role_privileges(root_role.id, &PrivilegeKey::all())
                    .await?;
                Ok::<InstitutionModel, Error>(institution)
            })
        })
        .await?;

    let response = Institution::from_model(institution);

    tracing::info!(
        target: TRACING_TARGET,
        institution_id = %response.institution_id,
        "Institution created",
    );

    let event = AuditLogEvent::new(
        AuditEventType::CreateInstitution,
        AuditObjectType::Institution,
        response.institution_id,
    )
    .with_institution(response.institution_id)
    .with_post(snapshot(&response));
    audit_log.record(&auth_state, event).await;

    Ok((StatusCode::CREATED, Json(response)))
}

fn create_institution_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create institution")
        .description(
            "Creates an institution and its root role holding every privilege. \
             Requires the realm administrator role.",
        )
        .response::<201, Json<Institution>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Returns the selected institution.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
    )
)]
async fn read_institution(
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionPathParams>,
    PgPool(mut conn): PgPool,
) -> Result<(StatusCode, Json<Institution>)> {
    auth_state.authorize_institution(path_params.institution_id)?;

    let institution = find_institution(&mut conn, path_params.institution_id).await?;

    tracing::debug!(target: TRACING_TARGET, "Institution read");

    Ok((StatusCode::OK, Json(Institution::from_model(institution))))
}

fn read_institution_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get institution")
        .description("Returns the institution selected for the session.")
        .response::<200, Json<Institution>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Updates the institution details.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
    )
)]
async fn update_institution(
    State(audit_log): State<AuditLog>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionPathParams>,
    PgPool(mut conn): PgPool,
    ValidateJson(request): ValidateJson<UpdateInstitution>,
) -> Result<(StatusCode, Json<Institution>)> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::EditInstitution)?;
    tracing::debug!(target: TRACING_TARGET, "Updating institution");

    let current = Institution::from_model(find_institution(&mut conn, path_params.institution_id).await?);
    let institution = conn
        .update_institution(path_params.institution_id, request.into_model())
        .await?;
    let response = Institution::from_model(institution);

    tracing::info!(target: TRACING_TARGET, "Institution updated");

    let event = AuditLogEvent::new(
        AuditEventType::ModifyInstitution,
        AuditObjectType::Institution,
        response.institution_id,
    )
    .with_institution(response.institution_id)
    .with_pre(snapshot(&current))
    .with_post(snapshot(&response));
    audit_log.record(&auth_state, event).await;

    Ok((StatusCode::OK, Json(response)))
}

fn update_institution_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update institution")
        .description("Updates the institution details. Only provided fields are changed.")
        .response::<200, Json<Institution>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

async fn find_institution(conn: &mut PgConn, institution_id: Uuid) -> Result<InstitutionModel> {
    conn.find_institution(institution_id).await?.ok_or_else(|| {
        ErrorKind::NotFound
            .with_message(format!("Institution not found: {institution_id}"))
            .with_resource("institution")
    })
}

/// Returns a [`Router`] with all institution routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/institutions/",
            get_with(list_institutions, list_institutions_docs)
                .post_with(create_institution, create_institution_docs),
        )
        .api_route(
            "/institutions/{institutionId}/",
            get_with(read_institution, read_institution_docs)
                .patch_with(update_institution, update_institution_docs),
        )
        .with_path_items(|item| item.tag("Institutions"))
}
