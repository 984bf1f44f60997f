//! Institution user, role assignment and vacation constraint violation handlers.

use authz_postgres::types::{
    InstitutionUserConstraints, InstitutionUserRoleConstraints, VacationConstraints,
};

use crate::handler::{Error, ErrorKind};

impl From<InstitutionUserConstraints> for Error<'static> {
    fn from(c: InstitutionUserConstraints) -> Self {
        let error = match c {
            InstitutionUserConstraints::EmailLength => {
                ErrorKind::BadRequest.with_message("Email address must be between 3 and 320 characters long")
            }
            InstitutionUserConstraints::MembershipUnique => ErrorKind::Conflict
                .with_message("The user is already a member of this institution"),
            InstitutionUserConstraints::DepartmentReference => {
                ErrorKind::BadRequest.with_message("Department does not exist")
            }
        };

        error.with_resource("institution_user")
    }
}

impl From<InstitutionUserRoleConstraints> for Error<'static> {
    fn from(c: InstitutionUserRoleConstraints) -> Self {
        let error = match c {
            InstitutionUserRoleConstraints::PrimaryKey => {
                ErrorKind::Conflict.with_message("Role is already assigned")
            }
            InstitutionUserRoleConstraints::RoleReference => {
                ErrorKind::BadRequest.with_message("Role does not exist")
            }
        };

        error.with_resource("institution_user")
    }
}

impl From<VacationConstraints> for Error<'static> {
    fn from(c: VacationConstraints) -> Self {
        match c {
            VacationConstraints::InstitutionDateRange | VacationConstraints::UserDateRange => {
                ErrorKind::BadRequest
                    .with_message("Vacation start date must not be after its end date")
                    .with_resource("vacation")
            }
            VacationConstraints::ExclusionUnique => ErrorKind::Conflict
                .with_message("Institution vacation is already excluded")
                .with_resource("vacation_exclusion"),
        }
    }
}
