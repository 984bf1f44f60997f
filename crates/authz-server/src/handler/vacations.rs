//! Vacation handlers.
//!
//! Both vacation sets are replaced as a whole. The submission is reconciled
//! against the stored rows and the resulting plan is written in one
//! transaction, so a rejected item leaves every row untouched.

use std::collections::HashSet;

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use authz_nats::audit::{AuditEventType, AuditLogEvent, AuditObjectType};
use authz_postgres::PgConnection;
use authz_postgres::query::VacationRepository;
use authz_postgres::types::{
    DateRange, ExclusionSyncPlan, LifecycleAction, PrivilegeKey, VacationSyncPlan,
};
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use super::institution_users::find_member;
use crate::extract::{AuthProvider, AuthState, Json, Path, PgPool, ValidateJson};
use crate::handler::request::{
    InstitutionPathParams, InstitutionUserPathParams, SyncInstitutionUserVacations,
    SyncInstitutionVacations,
};
use crate::handler::response::{ErrorResponse, InstitutionUserVacations, InstitutionVacations};
use crate::handler::{Error, Result};
use crate::service::{AuditLog, ServiceState, snapshot};

/// Tracing target for vacation operations.
const TRACING_TARGET: &str = "authz_server::handler::vacations";

async fn load_institution_vacations(
    conn: &mut PgConnection,
    institution_id: Uuid,
) -> Result<InstitutionVacations> {
    let vacations = conn.list_institution_vacations(institution_id).await?;
    Ok(InstitutionVacations::from_models(institution_id, vacations))
}

async fn load_user_vacations(
    conn: &mut PgConnection,
    institution_user_id: Uuid,
) -> Result<InstitutionUserVacations> {
    let vacations = conn.list_institution_user_vacations(institution_user_id).await?;
    let exclusions = conn.list_vacation_exclusions(institution_user_id).await?;
    Ok(InstitutionUserVacations::from_models(
        institution_user_id,
        vacations,
        exclusions,
    ))
}

/// Returns the institution-wide vacations.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
    )
)]
async fn read_institution_vacations(
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionPathParams>,
    PgPool(mut conn): PgPool,
) -> Result<(StatusCode, Json<InstitutionVacations>)> {
    auth_state.authorize_institution(path_params.institution_id)?;

    let response = load_institution_vacations(&mut conn, path_params.institution_id).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        vacation_count = response.vacations.len(),
        "Institution vacations read",
    );

    Ok((StatusCode::OK, Json(response)))
}

fn read_institution_vacations_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get institution vacations")
        .description("Returns the vacations that apply to every member of the institution.")
        .response::<200, Json<InstitutionVacations>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Replaces the institution-wide vacations.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
    )
)]
async fn sync_institution_vacations(
    State(audit_log): State<AuditLog>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionPathParams>,
    PgPool(mut conn): PgPool,
    ValidateJson(request): ValidateJson<SyncInstitutionVacations>,
) -> Result<(StatusCode, Json<InstitutionVacations>)> {
    auth_state.authorize_privilege(
        path_params.institution_id,
        PrivilegeKey::EditInstitutionVacation,
    )?;
    tracing::debug!(target: TRACING_TARGET, "Synchronizing institution vacations");

    let institution_id = path_params.institution_id;
    let submitted = request.submitted();

    let (before, after, plan) = conn
        .transaction(|conn| {
            Box::pin(async move {
                let existing = conn.list_institution_vacations(institution_id).await?;
                let ranges: Vec<(Uuid, DateRange)> =
                    existing.iter().map(|row| (row.id, row.range())).collect();
                let plan = VacationSyncPlan::reconcile(&ranges, &submitted)?;

                conn.apply_institution_vacation_plan(institution_id, &plan)
                    .await?;

                let before = InstitutionVacations::from_models(institution_id, existing);
                let after = load_institution_vacations(conn, institution_id).await?;
                Ok::<_, Error>((before, after, plan))
            })
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        inserted = plan.inserts.len(),
        updated = plan.updates.len(),
        deleted = plan.deletes.len(),
        "Institution vacations synchronized",
    );

    if !plan.is_empty() {
        let event = AuditLogEvent::new(
            AuditEventType::ModifyInstitutionVacations,
            AuditObjectType::InstitutionVacation,
            institution_id,
        )
        .with_institution(institution_id)
        .with_pre(snapshot(&before))
        .with_post(snapshot(&after));
        audit_log.record(&auth_state, event).await;
    }

    Ok((StatusCode::OK, Json(after)))
}

fn sync_institution_vacations_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Replace institution vacations")
        .description(
            "Replaces the institution vacation set. Items without an id are created, \
             items with an id are updated, and stored vacations missing from the \
             submission are removed. Reversed ranges, repeated ranges, repeated ids \
             and unknown ids are rejected before anything is written.",
        )
        .response::<200, Json<InstitutionVacations>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Returns a member's personal vacations and exclusions.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
        institution_user_id = %path_params.institution_user_id,
    )
)]
async fn read_institution_user_vacations(
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionUserPathParams>,
    PgPool(mut conn): PgPool,
) -> Result<(StatusCode, Json<InstitutionUserVacations>)> {
    auth_state.authorize_self_or_privilege(
        path_params.institution_id,
        path_params.institution_user_id,
        PrivilegeKey::ViewUser,
    )?;

    find_member(
        &mut conn,
        path_params.institution_id,
        path_params.institution_user_id,
    )
    .await?;
    let response = load_user_vacations(&mut conn, path_params.institution_user_id).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        vacation_count = response.vacations.len(),
        exclusion_count = response.excluded_institution_vacation_ids.len(),
        "Institution user vacations read",
    );

    Ok((StatusCode::OK, Json(response)))
}

fn read_institution_user_vacations_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get institution user vacations")
        .description(
            "Returns a member's personal vacations and the institution vacations excluded for them.",
        )
        .response::<200, Json<InstitutionUserVacations>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Replaces a member's personal vacations and exclusions.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
        institution_user_id = %path_params.institution_user_id,
    )
)]
async fn sync_institution_user_vacations(
    State(audit_log): State<AuditLog>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionUserPathParams>,
    PgPool(mut conn): PgPool,
    ValidateJson(request): ValidateJson<SyncInstitutionUserVacations>,
) -> Result<(StatusCode, Json<InstitutionUserVacations>)> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::EditUserVacation)?;
    tracing::debug!(target: TRACING_TARGET, "Synchronizing institution user vacations");

    let InstitutionUserPathParams {
        institution_id,
        institution_user_id,
    } = path_params;
    let submitted = request.submitted();
    let excluded = request.excluded_institution_vacation_ids;

    let (before, after, changed) = conn
        .transaction(|conn| {
            Box::pin(async move {
                let member = find_member(conn, institution_id, institution_user_id).await?;
                let institution_user = &member.institution_user;
                LifecycleAction::Update.check(
                    institution_user.status(),
                    institution_user.has_scheduled_deactivation(),
                )?;

                let before = load_user_vacations(conn, institution_user_id).await?;

                let existing = conn
                    .list_institution_user_vacations(institution_user_id)
                    .await?;
                let ranges: Vec<(Uuid, DateRange)> =
                    existing.iter().map(|row| (row.id, row.range())).collect();
                let vacation_plan = VacationSyncPlan::reconcile(&ranges, &submitted)?;

                let available: HashSet<Uuid> = conn
                    .list_institution_vacations(institution_id)
                    .await?
                    .into_iter()
                    .map(|row| row.id)
                    .collect();
                let exclusion_plan = ExclusionSyncPlan::reconcile(
                    &before.excluded_institution_vacation_ids,
                    &excluded,
                    &available,
                )?;

                conn.apply_institution_user_vacation_plan(institution_user_id, &vacation_plan)
                    .await?;
                conn.apply_vacation_exclusion_plan(institution_user_id, &exclusion_plan)
                    .await?;

                let changed = !vacation_plan.is_empty()
                    || !exclusion_plan.inserts.is_empty()
                    || !exclusion_plan.deletes.is_empty();
                let after = load_user_vacations(conn, institution_user_id).await?;
                Ok::<_, Error>((before, after, changed))
            })
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        changed,
        vacation_count = after.vacations.len(),
        exclusion_count = after.excluded_institution_vacation_ids.len(),
        "Institution user vacations synchronized",
    );

    if changed {
        let event = AuditLogEvent::new(
            AuditEventType::ModifyUserVacations,
            AuditObjectType::InstitutionUserVacation,
            institution_user_id,
        )
        .with_institution(institution_id)
        .with_pre(snapshot(&before))
        .with_post(snapshot(&after));
        audit_log.record(&auth_state, event).await;
    }

    Ok((StatusCode::OK, Json(after)))
}

fn sync_institution_user_vacations_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Replace institution user vacations")
        .description(
            "Replaces a member's personal vacation set and the set of excluded institution \
             vacations. Excluded ids must refer to vacations of the same institution.",
        )
        .response::<200, Json<InstitutionUserVacations>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with all vacation routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/institutions/{institutionId}/vacations/",
            get_with(read_institution_vacations, read_institution_vacations_docs)
                .put_with(sync_institution_vacations, sync_institution_vacations_docs),
        )
        .api_route(
            "/institutions/{institutionId}/users/{institutionUserId}/vacations/",
            get_with(
                read_institution_user_vacations,
                read_institution_user_vacations_docs,
            )
            .put_with(
                sync_institution_user_vacations,
                sync_institution_user_vacations_docs,
            ),
        )
        .with_path_items(|item| item.tag("Vacations"))
}
