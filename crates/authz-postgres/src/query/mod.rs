//! Database query repositories for all entities in the system.
//!
//! Every repository is a trait implemented for [`PgConnection`], so the
//! methods are available on pooled connections and inside transactions alike.
//! Reads skip soft-deleted rows unless stated otherwise.
//!
//! [`PgConnection`]: crate::PgConnection

mod department;
mod institution;
mod institution_user;
mod privilege;
mod role;
mod user;
mod vacation;

pub use department::DepartmentRepository;
pub use institution::InstitutionRepository;
pub use institution_user::{InstitutionUserRepository, InstitutionUserWithRoles};
pub use privilege::PrivilegeRepository;
pub use role::{RoleRepository, RoleWithPrivileges};
pub use user::UserRepository;
pub use vacation::VacationRepository;
