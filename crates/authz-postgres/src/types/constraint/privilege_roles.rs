//! Role privilege grant constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Role privilege grant constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum PrivilegeRoleConstraints {
    // Grant uniqueness constraints
    #[strum(serialize = "privilege_roles_pkey")]
    PrimaryKey,

    // Grant reference constraints
    #[strum(serialize = "privilege_roles_privilege_id_fkey")]
    PrivilegeReference,
}

impl PrivilegeRoleConstraints {
    /// Creates a new [`PrivilegeRoleConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            PrivilegeRoleConstraints::PrimaryKey => ConstraintCategory::Uniqueness,

            PrivilegeRoleConstraints::PrivilegeReference => ConstraintCategory::BusinessLogic,
        }
    }
}

impl From<PrivilegeRoleConstraints> for String {
    #[inline]
    fn from(val: PrivilegeRoleConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for PrivilegeRoleConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
