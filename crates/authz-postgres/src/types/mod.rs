//! Contains constraints, enumerations and other custom types.

mod calendar;
mod constraint;
mod enums;
mod filtering;
mod lifecycle;
mod pagination;
mod vacation_sync;

pub use calendar::{TALLINN_TIME_ZONE, local_date, local_today, tallinn};
pub use constraint::{
    ConstraintCategory, ConstraintViolation, DepartmentConstraints, InstitutionConstraints,
    InstitutionUserConstraints, InstitutionUserRoleConstraints, PrivilegeRoleConstraints,
    RoleConstraints, UserConstraints, VacationConstraints,
};
pub use enums::{InstitutionUserStatus, PrivilegeKey};
pub use filtering::InstitutionUserFilter;
pub use lifecycle::{
    LifecycleAction, LifecycleError, RootRoleGuard, check_activation_roles, check_deactivation_date,
    loses_root_role,
};
pub use pagination::{MAX_LIMIT, OffsetPage, OffsetPagination};
pub use vacation_sync::{
    DateRange, ExclusionSyncPlan, SubmittedVacation, VacationSyncError, VacationSyncPlan,
};
