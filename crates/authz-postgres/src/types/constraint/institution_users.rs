//! Institution users table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Institution users table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum InstitutionUserConstraints {
    // Membership validation constraints
    #[strum(serialize = "institution_users_email_length")]
    EmailLength,

    // Membership uniqueness constraints
    #[strum(serialize = "institution_users_membership_unique_idx")]
    MembershipUnique,

    // Membership reference constraints
    #[strum(serialize = "institution_users_department_id_fkey")]
    DepartmentReference,
}

impl InstitutionUserConstraints {
    /// Creates a new [`InstitutionUserConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            InstitutionUserConstraints::EmailLength => ConstraintCategory::Validation,

            InstitutionUserConstraints::MembershipUnique => ConstraintCategory::Uniqueness,

            InstitutionUserConstraints::DepartmentReference => ConstraintCategory::BusinessLogic,
        }
    }
}

impl From<InstitutionUserConstraints> for String {
    #[inline]
    fn from(val: InstitutionUserConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for InstitutionUserConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
