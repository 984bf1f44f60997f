//! Role assignment constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Role assignment constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum InstitutionUserRoleConstraints {
    // Assignment uniqueness constraints
    #[strum(serialize = "institution_user_roles_pkey")]
    PrimaryKey,

    // Assignment reference constraints
    #[strum(serialize = "institution_user_roles_role_id_fkey")]
    RoleReference,
}

impl InstitutionUserRoleConstraints {
    /// Creates a new [`InstitutionUserRoleConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            InstitutionUserRoleConstraints::PrimaryKey => ConstraintCategory::Uniqueness,

            InstitutionUserRoleConstraints::RoleReference => ConstraintCategory::BusinessLogic,
        }
    }
}

impl From<InstitutionUserRoleConstraints> for String {
    #[inline]
    fn from(val: InstitutionUserRoleConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for InstitutionUserRoleConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
