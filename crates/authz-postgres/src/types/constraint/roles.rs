//! Roles table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Roles table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum RoleConstraints {
    // Role validation constraints
    #[strum(serialize = "roles_name_length")]
    NameLength,

    // Role business logic constraints
    #[strum(serialize = "roles_root_not_deleted")]
    RootNotDeleted,

    // Role uniqueness constraints
    #[strum(serialize = "roles_name_unique_idx")]
    NameUnique,
    #[strum(serialize = "roles_root_unique_idx")]
    RootUnique,
}

impl RoleConstraints {
    /// Creates a new [`RoleConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            RoleConstraints::NameLength => ConstraintCategory::Validation,

            RoleConstraints::RootNotDeleted => ConstraintCategory::BusinessLogic,

            RoleConstraints::NameUnique
            | RoleConstraints::RootUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<RoleConstraints> for String {
    #[inline]
    fn from(val: RoleConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for RoleConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
