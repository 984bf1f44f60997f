//! Lifecycle and vacation reconciliation errors as HTTP errors.

use authz_postgres::types::{LifecycleError, VacationSyncError};

use crate::handler::response::ValidationErrorDetail;
use crate::handler::{Error, ErrorKind};

impl From<LifecycleError> for Error<'static> {
    fn from(error: LifecycleError) -> Self {
        let kind = match error {
            LifecycleError::DeactivationDateInPast { .. } | LifecycleError::RolesRequired => {
                ErrorKind::BadRequest
            }
            LifecycleError::Archived
            | LifecycleError::AlreadyDeactivated
            | LifecycleError::NotDeactivated
            | LifecycleError::SoleRootHolder { .. } => ErrorKind::Conflict,
        };

        kind.with_message(error.to_string())
            .with_resource("institution_user")
    }
}

impl From<VacationSyncError> for Error<'static> {
    fn from(error: VacationSyncError) -> Self {
        let code = match error {
            VacationSyncError::InvalidRange { .. } => "invalid_range",
            VacationSyncError::DuplicateRange { .. } => "duplicate_range",
            VacationSyncError::DuplicateId { .. } => "duplicate_id",
            VacationSyncError::UnknownId { .. } => "unknown_id",
        };

        let detail = ValidationErrorDetail::new(
            format!("[{}]", error.index()),
            code,
            error.to_string(),
        );

        ErrorKind::Validation
            .with_message(error.to_string())
            .with_resource("vacation")
            .with_validation(vec![detail])
    }
}

#[cfg(test)]
mod tests {
    use authz_postgres::types::LifecycleAction;
    use jiff::civil::date;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn sole_root_holder_is_conflict() {
        let error: Error = LifecycleError::SoleRootHolder {
            action: LifecycleAction::Archive,
        }
        .into();
        assert_eq!(error.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn past_deactivation_date_is_bad_request() {
        let error: Error = LifecycleError::DeactivationDateInPast {
            date: date(2024, 1, 1),
            today: date(2024, 1, 2),
        }
        .into();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn vacation_error_reports_index() {
        let error: Error = VacationSyncError::UnknownId {
            index: 3,
            id: Uuid::nil(),
        }
        .into();

        let details = error.validation().unwrap_or_default();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field, "[3]");
        assert_eq!(details[0].code, "unknown_id");
    }
}
