//! Vacation and vacation exclusion constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Vacation and vacation exclusion constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum VacationConstraints {
    // Vacation validation constraints
    #[strum(serialize = "institution_vacations_date_range")]
    InstitutionDateRange,
    #[strum(serialize = "institution_user_vacations_date_range")]
    UserDateRange,

    // Exclusion uniqueness constraints
    #[strum(serialize = "institution_vacation_exclusions_unique_idx")]
    ExclusionUnique,
}

impl VacationConstraints {
    /// Creates a new [`VacationConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            VacationConstraints::InstitutionDateRange
            | VacationConstraints::UserDateRange => ConstraintCategory::Validation,

            VacationConstraints::ExclusionUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<VacationConstraints> for String {
    #[inline]
    fn from(val: VacationConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for VacationConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
