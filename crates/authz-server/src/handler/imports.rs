//! Staff CSV export and import handlers.
//!
//! Imports are checked twice: once against the file itself while parsing,
//! then against the institution (role names, existing memberships). The
//! dry run reports every problem; the real import writes nothing unless the
//! whole file is clean.

use std::collections::HashMap;

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use authz_nats::audit::{AuditEventType, AuditLogEvent, AuditObjectType};
use authz_postgres::PgConnection;
use authz_postgres::model::{NewDepartment, NewInstitutionUser, NewUser, User as UserModel};
use authz_postgres::query::{
    DepartmentRepository, InstitutionUserRepository, RoleRepository, UserRepository,
};
use authz_postgres::types::{
    InstitutionUserFilter, InstitutionUserStatus, MAX_LIMIT, OffsetPagination, PrivilegeKey,
    local_today,
};
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use uuid::Uuid;

use crate::extract::{AuthProvider, AuthState, Json, Multipart, Path, PgPool};
use crate::handler::request::{InstitutionPathParams, ROLE_SEPARATOR, StaffImport, row_error};
use crate::handler::response::{
    ErrorResponse, ImportSummary, ImportValidation, StaffExportRow, ValidationErrorDetail,
    write_staff_csv,
};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{AuditLog, ServiceState, snapshot};

/// Tracing target for staff import and export operations.
const TRACING_TARGET: &str = "authz_server::handler::imports";

/// Name of the multipart field carrying the CSV file.
const FILE_FIELD: &str = "file";

/// Largest accepted CSV upload.
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Reads the CSV file from the multipart body.
async fn read_file(Multipart(mut multipart): Multipart) -> Result<Vec<u8>> {
    while let Some(field) = multipart.next_field().await.map_err(|err| {
        tracing::warn!(target: TRACING_TARGET, error = %err, "Failed to read multipart field");
        ErrorKind::BadRequest
            .with_message("Invalid multipart data")
            .with_context(format!("Failed to parse multipart form: {err}"))
    })? {
        if field.name() != Some(FILE_FIELD) {
            tracing::debug!(target: TRACING_TARGET, field = ?field.name(), "Skipping field");
            continue;
        }

        let data = field.bytes().await.map_err(|err| {
            ErrorKind::BadRequest
                .with_message("Could not read the uploaded file")
                .with_context(err.to_string())
        })?;

        if data.len() > MAX_FILE_SIZE {
            return Err(ErrorKind::PayloadTooLarge
                .with_message(format!("The file exceeds {MAX_FILE_SIZE} bytes")));
        }

        return Ok(data.to_vec());
    }

    Err(ErrorKind::BadRequest
        .with_message(format!("Missing `{FILE_FIELD}` field in multipart request")))
}

/// Institution data the rows of an import refer to.
#[derive(Debug, Default)]
struct ImportContext {
    role_ids: HashMap<String, Uuid>,
    users: HashMap<String, UserModel>,
}

/// Checks parsed rows against the institution and appends every problem to
/// `import.errors`.
async fn check_import(
    conn: &mut PgConnection,
    institution_id: Uuid,
    import: &mut StaffImport,
) -> Result<ImportContext> {
    if import.row_count == 0 && import.is_valid() {
        import.errors.push(ValidationErrorDetail::new(
            "file",
            "empty_file",
            "The file contains no data rows",
        ));
    }

    let role_ids: HashMap<String, Uuid> = conn
        .find_roles_by_names(institution_id, &import.role_names())
        .await?
        .into_iter()
        .map(|role| (role.name, role.id))
        .collect();

    let codes: Vec<String> = import
        .rows
        .iter()
        .map(|(_, row)| row.personal_identification_code.clone())
        .collect();
    let users: HashMap<String, UserModel> = conn
        .find_users_by_pics(&codes)
        .await?
        .into_iter()
        .map(|user| (user.personal_identification_code.clone(), user))
        .collect();

    for (index, row) in &import.rows {
        for name in row.role_names() {
            if !role_ids.contains_key(&name) {
                import.errors.push(row_error(
                    *index,
                    "roles",
                    "unknown_role",
                    format!("Role `{name}` does not exist in the institution"),
                ));
            }
        }

        let Some(user) = users.get(&row.personal_identification_code) else {
            continue;
        };

        if !row.names_match(&user.forename, &user.surname) {
            import.errors.push(row_error(
                *index,
                "forename",
                "name_mismatch",
                format!(
                    "The person is registered as {} {}",
                    user.forename, user.surname
                ),
            ));
        }

        if conn
            .find_unarchived_membership(institution_id, user.id)
            .await?
            .is_some()
        {
            import.errors.push(row_error(
                *index,
                "personal_identification_code",
                "existing_membership",
                "The person already belongs to the institution",
            ));
        }
    }

    Ok(ImportContext { role_ids, users })
}

/// Exports the institution's staff as CSV.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
    )
)]
async fn export_institution_users(
    State(audit_log): State<AuditLog>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionPathParams>,
    PgPool(mut conn): PgPool,
) -> Result<(StatusCode, HeaderMap, Vec<u8>)> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::ExportUser)?;
    let institution_id = path_params.institution_id;

    let departments: HashMap<Uuid, String> = conn
        .list_departments(institution_id)
        .await?
        .into_iter()
        .map(|department| (department.id, department.name))
        .collect();

    let filter = InstitutionUserFilter {
        statuses: vec![
            InstitutionUserStatus::Active,
            InstitutionUserStatus::Deactivated,
        ],
        ..Default::default()
    };

    let today = local_today();
    let mut rows = Vec::new();
    let mut pagination = OffsetPagination::new(MAX_LIMIT, 0);
    loop {
        let page = conn
            .list_institution_users(institution_id, &filter, pagination, today)
            .await?;
        let exhausted = !page.is_full(&pagination);

        for member in page.items {
            let mut role_names: Vec<String> =
                member.roles.into_iter().map(|role| role.name).collect();
            role_names.sort();

            rows.push(StaffExportRow {
                personal_identification_code: member.user.personal_identification_code,
                forename: member.user.forename,
                surname: member.user.surname,
                email: member.institution_user.email,
                phone: member.institution_user.phone,
                department: member
                    .institution_user
                    .department_id
                    .and_then(|id| departments.get(&id).cloned()),
                roles: role_names.join(&ROLE_SEPARATOR.to_string()),
            });
        }

        if exhausted {
            break;
        }
        pagination = pagination.next_page();
    }

    let body = write_staff_csv(&rows).map_err(|err| {
        tracing::error!(target: TRACING_TARGET, error = %err, "Failed to write staff CSV");
        ErrorKind::InternalServerError
            .with_message("Failed to export staff")
            .with_context(err.to_string())
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    let disposition = format!("attachment; filename=\"staff_{institution_id}.csv\"");
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::try_from(disposition).map_err(|err| {
            ErrorKind::InternalServerError.with_context(err.to_string())
        })?,
    );

    tracing::info!(
        target: TRACING_TARGET,
        row_count = rows.len(),
        size = body.len(),
        "Staff exported",
    );

    let event = AuditLogEvent::new(
        AuditEventType::ExportUsers,
        AuditObjectType::Institution,
        institution_id,
    )
    .with_institution(institution_id);
    audit_log.record(&auth_state, event).await;

    Ok((StatusCode::OK, headers, body))
}

fn export_institution_users_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Export institution users")
        .description(
            "Downloads active and deactivated members as CSV. The file uses the same \
             header as the import.",
        )
        .response::<200, Vec<u8>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Validates a staff CSV file without writing.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
    )
)]
async fn validate_import(
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionPathParams>,
    PgPool(mut conn): PgPool,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ImportValidation>)> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::AddUser)?;

    let data = read_file(multipart).await?;
    let mut import = StaffImport::parse(&data);
    check_import(&mut conn, path_params.institution_id, &mut import).await?;

    tracing::info!(
        target: TRACING_TARGET,
        row_count = import.row_count,
        error_count = import.errors.len(),
        "Staff file validated",
    );

    let response = ImportValidation {
        row_count: import.row_count,
        is_valid: import.is_valid(),
        errors: import.errors,
    };

    Ok((StatusCode::OK, Json(response)))
}

fn validate_import_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Validate a staff file")
        .description(
            "Checks a staff CSV file uploaded in the `file` field and returns every \
             row error without writing anything.",
        )
        .response::<200, Json<ImportValidation>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<413, Json<ErrorResponse>>()
}

/// Imports a staff CSV file.
#[tracing::instrument(
    skip_all,
    fields(
        subject = %auth_state.subject,
        institution_id = %path_params.institution_id,
    )
)]
async fn import_institution_users(
    State(audit_log): State<AuditLog>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InstitutionPathParams>,
    PgPool(mut conn): PgPool,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ImportSummary>)> {
    auth_state.authorize_privilege(path_params.institution_id, PrivilegeKey::AddUser)?;

    let institution_id = path_params.institution_id;
    let data = read_file(multipart).await?;
    let mut import = StaffImport::parse(&data);

    let summary = conn
        .transaction(|conn| {
            Box::pin(async move {
                let context = check_import(conn, institution_id, &mut import).await?;
                if !import.is_valid() {
                    return Err(ErrorKind::Validation
                        .with_message("The staff file contains errors")
                        .with_validation(import.errors));
                }

                let mut summary = ImportSummary {
                    row_count: import.row_count,
                    ..Default::default()
                };

                let mut department_ids: HashMap<String, Uuid> = conn
                    .list_departments(institution_id)
                    .await?
                    .into_iter()
                    .map(|department| (department.name, department.id))
                    .collect();

                let ImportContext {
                    role_ids,
                    mut users,
                } = context;

                for (_, row) in &import.rows {
                    let department_id = match row.department_name() {
                        None => None,
                        Some(name) => match department_ids.get(name) {
                            Some(id) => Some(*id),
                            None => {
                                let department = conn
                                    .create_department(NewDepartment::new(institution_id, name))
                                    .await?;
                                summary.created_departments += 1;
                                department_ids.insert(department.name, department.id);
                                Some(department.id)
                            }
                        },
                    };

                    let user_id = match users.remove(&row.personal_identification_code) {
                        Some(user) => user.id,
                        None => {
                            let user = conn
                                .create_user(NewUser {
                                    personal_identification_code: row
                                        .personal_identification_code
                                        .clone(),
                                    forename: row.forename.clone(),
                                    surname: row.surname.clone(),
                                })
                                .await?;
                            summary.created_users += 1;
                            user.id
                        }
                    };

                    let member = conn
                        .create_institution_user(NewInstitutionUser {
                            institution_id,
                            user_id,
                            department_id,
                            email: row.email.clone(),
                            phone: row.phone.clone(),
                        })
                        .await?;
                    summary.created_institution_users += 1;

                    let mut roles: Vec<Uuid> = row
                        .role_names()
                        .iter()
                        .filter_map(|name| role_ids.get(name).copied())
                        .collect();
                    roles.sort();
                    roles.dedup();
                    conn.replace_institution_user_roles(member.id, &roles)
                        .await?;
                }

                Ok::<_, Error>(summary)
            })
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        row_count = summary.row_count,
        created_users = summary.created_users,
        created_departments = summary.created_departments,
        "Staff imported",
    );

    let event = AuditLogEvent::new(
        AuditEventType::ImportUsers,
        AuditObjectType::Institution,
        institution_id,
    )
    .with_institution(institution_id)
    .with_post(snapshot(&summary));
    audit_log.record(&auth_state, event).await;

    Ok((StatusCode::CREATED, Json(summary)))
}

fn import_institution_users_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Import a staff file")
        .description(
            "Imports a staff CSV file uploaded in the `file` field. Unknown departments \
             and persons are created. A known person must be named as registered. \
             Nothing is written when any row has an error; the errors are returned \
             in `validation`.",
        )
        .response::<201, Json<ImportSummary>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
        .response::<413, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with the staff import and export routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/institutions/{institutionId}/users/export/",
            get_with(export_institution_users, export_institution_users_docs),
        )
        .api_route(
            "/institutions/{institutionId}/users/import/validate/",
            post_with(validate_import, validate_import_docs),
        )
        .api_route(
            "/institutions/{institutionId}/users/import/",
            post_with(import_institution_users, import_institution_users_docs),
        )
        .with_path_items(|item| item.tag("Staff import"))
}
