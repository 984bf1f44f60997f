//! Database models for all tables.
//!
//! Each table has a queryable row type, an insertable `New*` type and, where
//! rows are mutable, an `Update*` changeset.

mod department;
mod institution;
mod institution_user;
mod institution_user_role;
mod institution_user_vacation;
mod institution_vacation;
mod institution_vacation_exclusion;
mod privilege;
mod privilege_role;
mod role;
mod user;

pub use department::{Department, NewDepartment, UpdateDepartment};
pub use institution::{Institution, NewInstitution, UpdateInstitution};
pub use institution_user::{InstitutionUser, NewInstitutionUser, UpdateInstitutionUser};
pub use institution_user_role::{InstitutionUserRole, NewInstitutionUserRole};
pub use institution_user_vacation::{
    InstitutionUserVacation, NewInstitutionUserVacation, UpdateInstitutionUserVacation,
};
pub use institution_vacation::{
    InstitutionVacation, NewInstitutionVacation, UpdateInstitutionVacation,
};
pub use institution_vacation_exclusion::{
    InstitutionVacationExclusion, NewInstitutionVacationExclusion,
};
pub use privilege::Privilege;
pub use privilege_role::{NewPrivilegeRole, PrivilegeRole};
pub use role::{NewRole, ROOT_ROLE_NAME, Role, UpdateRole};
pub use user::{NewUser, UpdateUser, User};
