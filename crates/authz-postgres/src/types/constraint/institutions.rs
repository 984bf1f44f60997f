//! Institutions table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Institutions table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum InstitutionConstraints {
    // Institution validation constraints
    #[strum(serialize = "institutions_name_length")]
    NameLength,
    #[strum(serialize = "institutions_short_name_length")]
    ShortNameLength,

    // Institution chronological constraints
    #[strum(serialize = "institutions_updated_after_created")]
    UpdatedAfterCreated,
}

impl InstitutionConstraints {
    /// Creates a new [`InstitutionConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            InstitutionConstraints::NameLength
            | InstitutionConstraints::ShortNameLength => ConstraintCategory::Validation,

            InstitutionConstraints::UpdatedAfterCreated => ConstraintCategory::Chronological,
        }
    }
}

impl From<InstitutionConstraints> for String {
    #[inline]
    fn from(val: InstitutionConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for InstitutionConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
