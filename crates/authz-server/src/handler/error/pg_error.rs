//! Database error to HTTP error conversion.
//!
//! Constraint violations are mapped per table in the sibling `pg_*` modules;
//! every other database failure becomes a logged `500`.

use authz_postgres::PgError;
use authz_postgres::error::DieselError;
use authz_postgres::types::ConstraintViolation;

use crate::handler::{Error, ErrorKind};

const TRACING_TARGET: &str = "authz_server::postgres_constraints";

impl From<ConstraintViolation> for Error<'static> {
    fn from(constraint: ConstraintViolation) -> Self {
        match constraint {
            ConstraintViolation::Institution(c) => c.into(),
            ConstraintViolation::User(c) => c.into(),
            ConstraintViolation::Department(c) => c.into(),
            ConstraintViolation::Role(c) => c.into(),
            ConstraintViolation::PrivilegeRole(c) => c.into(),
            ConstraintViolation::InstitutionUser(c) => c.into(),
            ConstraintViolation::InstitutionUserRole(c) => c.into(),
            ConstraintViolation::Vacation(c) => c.into(),
        }
    }
}

impl From<PgError> for Error<'static> {
    fn from(error: PgError) -> Self {
        if let Some(constraint) = error.constraint_violation() {
            tracing::debug!(
                target: TRACING_TARGET,
                constraint = %constraint,
                category = ?constraint.constraint_category(),
                "constraint violated"
            );
            return constraint.into();
        }

        if error.is_not_found() {
            return ErrorKind::NotFound.into_error();
        }

        if error.is_unavailable() {
            tracing::error!(target: TRACING_TARGET, error = %error, "database unavailable");
            return ErrorKind::ServiceUnavailable.into_error();
        }

        tracing::error!(target: TRACING_TARGET, error = %error, "database failure");
        ErrorKind::InternalServerError.into_error()
    }
}

// Transaction closures surface raw Diesel errors.
impl From<DieselError> for Error<'static> {
    fn from(error: DieselError) -> Self {
        let pg_error: PgError = error.into();
        pg_error.into()
    }
}

#[cfg(test)]
mod tests {
    use authz_postgres::types::{DepartmentConstraints, RoleConstraints};
    use authz_postgres::error::TimeoutType;

    use super::*;

    #[test]
    fn uniqueness_maps_to_conflict() {
        let error: Error = ConstraintViolation::Department(DepartmentConstraints::NameUnique).into();
        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.resource(), Some("department"));
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let error: Error = ConstraintViolation::Role(RoleConstraints::NameLength).into();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn pool_timeout_maps_to_503() {
        let error: Error = PgError::Timeout(TimeoutType::Wait).into();
        assert_eq!(error.kind(), ErrorKind::ServiceUnavailable);
    }

    #[test]
    fn not_found_query_maps_to_404() {
        let error: Error = PgError::from(DieselError::NotFound).into();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }
}
