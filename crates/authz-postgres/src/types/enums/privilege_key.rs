//! Privilege key enumeration for role-based access control.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// A single capability that can be granted to a role.
///
/// The catalog is fixed and corresponds to the `PRIVILEGE_KEY` PostgreSQL enum.
/// Keys are carried verbatim in access tokens and API payloads.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[ExistingTypePath = "crate::schema::sql_types::PrivilegeKey"]
pub enum PrivilegeKey {
    /// Create roles within the institution
    #[db_rename = "ADD_ROLE"]
    #[serde(rename = "ADD_ROLE")]
    AddRole,

    /// View roles and their privileges
    #[db_rename = "VIEW_ROLE"]
    #[serde(rename = "VIEW_ROLE")]
    #[default]
    ViewRole,

    /// Rename roles and change their privileges
    #[db_rename = "EDIT_ROLE"]
    #[serde(rename = "EDIT_ROLE")]
    EditRole,

    /// Delete roles
    #[db_rename = "DELETE_ROLE"]
    #[serde(rename = "DELETE_ROLE")]
    DeleteRole,

    /// Add institution users, including CSV import
    #[db_rename = "ADD_USER"]
    #[serde(rename = "ADD_USER")]
    AddUser,

    /// Edit institution user details and role assignments
    #[db_rename = "EDIT_USER"]
    #[serde(rename = "EDIT_USER")]
    EditUser,

    /// View institution users
    #[db_rename = "VIEW_USER"]
    #[serde(rename = "VIEW_USER")]
    ViewUser,

    /// Export institution users as CSV
    #[db_rename = "EXPORT_USER"]
    #[serde(rename = "EXPORT_USER")]
    ExportUser,

    /// Reactivate deactivated institution users
    #[db_rename = "ACTIVATE_USER"]
    #[serde(rename = "ACTIVATE_USER")]
    ActivateUser,

    /// Deactivate institution users
    #[db_rename = "DEACTIVATE_USER"]
    #[serde(rename = "DEACTIVATE_USER")]
    DeactivateUser,

    /// Archive and remove institution users
    #[db_rename = "ARCHIVE_USER"]
    #[serde(rename = "ARCHIVE_USER")]
    ArchiveUser,

    /// Edit institution user vacations and exclusions
    #[db_rename = "EDIT_USER_VACATION"]
    #[serde(rename = "EDIT_USER_VACATION")]
    EditUserVacation,

    /// Edit institution details
    #[db_rename = "EDIT_INSTITUTION"]
    #[serde(rename = "EDIT_INSTITUTION")]
    EditInstitution,

    /// Edit institution-wide vacations
    #[db_rename = "EDIT_INSTITUTION_VACATION"]
    #[serde(rename = "EDIT_INSTITUTION_VACATION")]
    EditInstitutionVacation,

    /// Create departments
    #[db_rename = "ADD_DEPARTMENT"]
    #[serde(rename = "ADD_DEPARTMENT")]
    AddDepartment,

    /// Rename departments
    #[db_rename = "EDIT_DEPARTMENT"]
    #[serde(rename = "EDIT_DEPARTMENT")]
    EditDepartment,

    /// Delete departments
    #[db_rename = "DELETE_DEPARTMENT"]
    #[serde(rename = "DELETE_DEPARTMENT")]
    DeleteDepartment,
}

impl PrivilegeKey {
    /// Returns every privilege key in catalog order.
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    /// Returns whether this privilege governs institution user management.
    #[inline]
    pub fn is_user_privilege(self) -> bool {
        matches!(
            self,
            PrivilegeKey::AddUser
                | PrivilegeKey::EditUser
                | PrivilegeKey::ViewUser
                | PrivilegeKey::ExportUser
                | PrivilegeKey::ActivateUser
                | PrivilegeKey::DeactivateUser
                | PrivilegeKey::ArchiveUser
                | PrivilegeKey::EditUserVacation
        )
    }

    /// Returns whether this privilege governs role management.
    #[inline]
    pub fn is_role_privilege(self) -> bool {
        matches!(
            self,
            PrivilegeKey::AddRole
                | PrivilegeKey::ViewRole
                | PrivilegeKey::EditRole
                | PrivilegeKey::DeleteRole
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_seventeen_keys() {
        assert_eq!(PrivilegeKey::all().len(), 17);
    }

    #[test]
    fn display_matches_wire_format() {
        assert_eq!(PrivilegeKey::EditUserVacation.to_string(), "EDIT_USER_VACATION");
        assert_eq!(
            "EDIT_INSTITUTION_VACATION".parse::<PrivilegeKey>().ok(),
            Some(PrivilegeKey::EditInstitutionVacation)
        );
        assert!("edit_user".parse::<PrivilegeKey>().is_err());
    }

    #[test]
    fn serde_uses_screaming_keys() {
        let json = serde_json::to_string(&PrivilegeKey::ArchiveUser).unwrap();
        assert_eq!(json, "\"ARCHIVE_USER\"");
        for key in PrivilegeKey::iter() {
            let json = serde_json::to_value(key).unwrap();
            assert_eq!(json.as_str(), Some(key.to_string().as_str()));
        }
    }
}
