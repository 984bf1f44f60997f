//! Institution, user, department and role constraint violation handlers.

use authz_postgres::types::{
    DepartmentConstraints, InstitutionConstraints, PrivilegeRoleConstraints, RoleConstraints,
    UserConstraints,
};

use crate::handler::{Error, ErrorKind};

impl From<InstitutionConstraints> for Error<'static> {
    fn from(c: InstitutionConstraints) -> Self {
        let error = match c {
            InstitutionConstraints::NameLength => ErrorKind::BadRequest
                .with_message("Institution name must be between 1 and 300 characters long"),
            InstitutionConstraints::ShortNameLength => {
                ErrorKind::BadRequest.with_message("Institution short name must be at most 3 characters long")
            }
            InstitutionConstraints::UpdatedAfterCreated => {
                ErrorKind::InternalServerError.into_error()
            }
        };

        error.with_resource("institution")
    }
}

impl From<UserConstraints> for Error<'static> {
    fn from(c: UserConstraints) -> Self {
        let error = match c {
            UserConstraints::PicFormat => ErrorKind::BadRequest
                .with_message("Personal identification code must consist of 11 digits"),
            UserConstraints::NameLength => {
                ErrorKind::BadRequest.with_message("Forename and surname must not be empty")
            }
            UserConstraints::PicUnique => ErrorKind::Conflict
                .with_message("A user with this personal identification code already exists"),
        };

        error.with_resource("user")
    }
}

impl From<DepartmentConstraints> for Error<'static> {
    fn from(c: DepartmentConstraints) -> Self {
        let error = match c {
            DepartmentConstraints::NameLength => ErrorKind::BadRequest
                .with_message("Department name must be between 1 and 255 characters long"),
            DepartmentConstraints::NameUnique => ErrorKind::Conflict
                .with_message("A department with this name already exists in the institution"),
        };

        error.with_resource("department")
    }
}

impl From<RoleConstraints> for Error<'static> {
    fn from(c: RoleConstraints) -> Self {
        let error = match c {
            RoleConstraints::NameLength => ErrorKind::BadRequest
                .with_message("Role name must be between 1 and 255 characters long"),
            RoleConstraints::RootNotDeleted => {
                ErrorKind::Conflict.with_message("The root role cannot be deleted")
            }
            RoleConstraints::NameUnique => ErrorKind::Conflict
                .with_message("A role with this name already exists in the institution"),
            RoleConstraints::RootUnique => {
                ErrorKind::Conflict.with_message("The institution already has a root role")
            }
        };

        error.with_resource("role")
    }
}

impl From<PrivilegeRoleConstraints> for Error<'static> {
    fn from(c: PrivilegeRoleConstraints) -> Self {
        let error = match c {
            PrivilegeRoleConstraints::PrimaryKey => {
                ErrorKind::Conflict.with_message("Privilege is already granted to the role")
            }
            PrivilegeRoleConstraints::PrivilegeReference => {
                ErrorKind::BadRequest.with_message("Unknown privilege")
            }
        };

        error.with_resource("role")
    }
}
