//! Vacation response types.

use authz_postgres::model;
use jiff::civil::Date;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored vacation.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vacation {
    /// ID of the vacation.
    pub id: Uuid,
    /// First day of the vacation.
    pub start_date: Date,
    /// Last day of the vacation, inclusive.
    pub end_date: Date,
}

impl From<model::InstitutionVacation> for Vacation {
    fn from(vacation: model::InstitutionVacation) -> Self {
        Self {
            id: vacation.id,
            start_date: vacation.start_date.into(),
            end_date: vacation.end_date.into(),
        }
    }
}

impl From<model::InstitutionUserVacation> for Vacation {
    fn from(vacation: model::InstitutionUserVacation) -> Self {
        Self {
            id: vacation.id,
            start_date: vacation.start_date.into(),
            end_date: vacation.end_date.into(),
        }
    }
}

/// The institution-wide vacation set.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionVacations {
    /// ID of the institution.
    pub institution_id: Uuid,
    /// Vacations ordered by start date.
    pub vacations: Vec<Vacation>,
}

impl InstitutionVacations {
    pub fn from_models(institution_id: Uuid, vacations: Vec<model::InstitutionVacation>) -> Self {
        Self {
            institution_id,
            vacations: vacations.into_iter().map(Vacation::from).collect(),
        }
    }
}

/// The personal vacation set of a member and the institution vacations
/// that do not apply to them.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionUserVacations {
    /// ID of the membership.
    pub institution_user_id: Uuid,
    /// Personal vacations ordered by start date.
    pub vacations: Vec<Vacation>,
    /// Institution vacations excluded for this member.
    pub excluded_institution_vacation_ids: Vec<Uuid>,
}

impl InstitutionUserVacations {
    pub fn from_models(
        institution_user_id: Uuid,
        vacations: Vec<model::InstitutionUserVacation>,
        exclusions: Vec<model::InstitutionVacationExclusion>,
    ) -> Self {
        Self {
            institution_user_id,
            vacations: vacations.into_iter().map(Vacation::from).collect(),
            excluded_institution_vacation_ids: exclusions
                .into_iter()
                .map(|exclusion| exclusion.institution_vacation_id)
                .collect(),
        }
    }
}
