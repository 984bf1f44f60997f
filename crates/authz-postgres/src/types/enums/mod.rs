//! Enumerations shared by models and queries.
//!
//! [`PrivilegeKey`] maps to a PostgreSQL enum, while [`InstitutionUserStatus`]
//! is computed from stored columns and never persisted.

mod institution_user_status;
mod privilege_key;

pub use institution_user_status::InstitutionUserStatus;
pub use privilege_key::PrivilegeKey;
