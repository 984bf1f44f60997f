//! Department handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use authz_nats::audit::{AuditEventType, AuditLogEvent, AuditObjectType};
use authz_postgres::PgConn;
use authz_postgres::model::Department as DepartmentModel;
use authz_postgres::query::DepartmentRepository;
use authz_postgres::types::PrivilegeKey;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use crate::extract::{AuthProvider, AuthState, Json, Path, PgPool, ValidateJson};
use crate::handler::request::{
    CreateDepartment, DepartmentPathParams, InstitutionPathParams, UpdateDepartment,
};
use crate::handler::response::{Department, ErrorResponse};
use crate::handler::{ErrorKind, Result};
use crate::service::{AuditLog, ServiceState, snapshot};

/// Tracing target for department operations.
const TRACING_TARGET: &str = "authz_server::handler::departments";

/// Lists the departments of the selected institution.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
    )
)]
async fn list_departments(
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionPathParams>,
    PgPool(mut conn): PgPool,
) -> Result<(StatusCode, Json<Vec<Department>>)> {
    auth_state.authorize_institution(path_params.institution_id)?;

    let departments = conn.list_departments(path_params.institution_id).await?;
    let departments = Department::from_models(departments);

    tracing::debug!(
        target: TRACING_TARGET,
        department_count = departments.len(),
        "Departments listed",
    );

    Ok((StatusCode::OK, Json(departments)))
}

fn list_departments_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List departments")
        .description("Returns the departments of the institution ordered by name.")
        .response::<200, Json<Vec<Department>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Creates a department.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
    )
)]
async fn create_department(
    State(audit_log): State<AuditLog>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionPathParams>,
    PgPool(mut conn): PgPool,
    ValidateJson(request): ValidateJson<CreateDepartment>,
) -> Result<(StatusCode, Json<Department>)> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::AddDepartment)?;
    tracing::debug!(target: TRACING_TARGET, "Creating department");

    let department = conn
        .create_department(request.into_model(path_params.institution_id))
        .await?;
    let response = Department::from_model(department);

    tracing::info!(
        target: TRACING_TARGET,
        department_id = %response.department_id,
        "Department created",
    );

    let event = AuditLogEvent::new(
        AuditEventType::CreateDepartment,
        AuditObjectType::Department,
        response.department_id,
    )
    .with_institution(path_params.institution_id)
    .with_post(snapshot(&response));
    audit_log.record(&auth_state, event).await;

    Ok((StatusCode::CREATED, Json(response)))
}

fn create_department_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create department")
        .description("Creates a department. Names are unique within the institution.")
        .response::<201, Json<Department>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Returns a department.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
        department_id = %path_params.department_id,
    )
)]
async fn read_department(
    AuthState(auth_state): AuthState,
    Path(path_params): Path<DepartmentPathParams>,
    PgPool(mut conn): PgPool,
) -> Result<(StatusCode, Json<Department>)> {
    auth_state.authorize_institution(path_params.institution_id)?;

    let department =
        find_department(&mut conn, path_params.institution_id, path_params.department_id).await?;

    tracing::debug!(target: TRACING_TARGET, "Department read");

    Ok((StatusCode::OK, Json(Department::from_model(department))))
}

fn read_department_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get department")
        .description("Returns a department of the institution.")
        .response::<200, Json<Department>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Renames a department.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
        department_id = %path_params.department_id,
    )
)]
async fn update_department(
    State(audit_log): State<AuditLog>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<DepartmentPathParams>,
    PgPool(mut conn): PgPool,
    ValidateJson(request): ValidateJson<UpdateDepartment>,
) -> Result<(StatusCode, Json<Department>)> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::EditDepartment)?;
    tracing::debug!(target: TRACING_TARGET, "Updating department");

    let current =
        find_department(&mut conn, path_params.institution_id, path_params.department_id).await?;
    let current = Department::from_model(current);

    let department = conn
        .update_department(
            path_params.institution_id,
            path_params.department_id,
            request.into_model(),
        )
        .await?;
    let response = Department::from_model(department);

    tracing::info!(target: TRACING_TARGET, "Department updated");

    let event = AuditLogEvent::new(
        AuditEventType::ModifyDepartment,
        AuditObjectType::Department,
        response.department_id,
    )
    .with_institution(path_params.institution_id)
    .with_pre(snapshot(&current))
    .with_post(snapshot(&response));
    audit_log.record(&auth_state, event).await;

    Ok((StatusCode::OK, Json(response)))
}

fn update_department_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update department")
        .description("Renames a department.")
        .response::<200, Json<Department>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Soft deletes a department.
///
/// Members of the department keep their membership without a department.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
        department_id = %path_params.department_id,
    )
)]
async fn delete_department(
    State(audit_log): State<AuditLog>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<DepartmentPathParams>,
    PgPool(mut conn): PgPool,
) -> Result<StatusCode> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::DeleteDepartment)?;
    tracing::debug!(target: TRACING_TARGET, "Deleting department");

    let current =
        find_department(&mut conn, path_params.institution_id, path_params.department_id).await?;
    let current = Department::from_model(current);

    conn.delete_department(path_params.institution_id, path_params.department_id)
        .await?;

    tracing::info!(target: TRACING_TARGET, "Department deleted");

    let event = AuditLogEvent::new(
        AuditEventType::RemoveDepartment,
        AuditObjectType::Department,
        current.department_id,
    )
    .with_institution(path_params.institution_id)
    .with_pre(snapshot(&current));
    audit_log.record(&auth_state, event).await;

    Ok(StatusCode::NO_CONTENT)
}

fn delete_department_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete department")
        .description("Soft deletes a department.")
        .response::<204, ()>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

async fn find_department(
    conn: &mut PgConn,
    institution_id: Uuid,
    department_id: Uuid,
) -> Result<DepartmentModel> {
    conn.find_department(institution_id, department_id)
        .await?
        .ok_or_else(|| {
            ErrorKind::NotFound
                .with_message(format!("Department not found: {department_id}"))
                .with_resource("department")
        })
}

/// Returns a [`Router`] with all department routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/institutions/{institutionId}/departments/",
            get_with(list_departments, list_departments_docs)
                .post_with(create_department, create_department_docs),
        )
        .api_route(
            "/institutions/{institutionId}/departments/{departmentId}/",
            get_with(read_department, read_department_docs)
                .patch_with(update_department, update_department_docs)
                .delete_with(delete_department, delete_department_docs),
        )
        .with_path_items(|item| item.tag("Departments"))
}
