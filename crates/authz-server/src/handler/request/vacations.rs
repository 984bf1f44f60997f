//! Vacation synchronization request types.
//!
//! Both endpoints replace a whole set: items without an id are inserted,
//! items with an id are updated, and stored rows missing from the
//! submission are removed.

use authz_postgres::types::{DateRange, SubmittedVacation};
use jiff::civil::Date;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::validations::validation_error;

fn validate_vacation_range(vacation: &Vacation) -> Result<(), ValidationError> {
    if vacation.start_date > vacation.end_date {
        return Err(validation_error(
            "invalid_range",
            "Start date must not be after end date",
        ));
    }
    Ok(())
}

/// One vacation in a submitted set.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_vacation_range"))]
pub struct Vacation {
    /// Identifier of a stored vacation; omit to create a new one.
    pub id: Option<Uuid>,
    /// First day of the vacation.
    pub start_date: Date,
    /// Last day of the vacation, inclusive.
    pub end_date: Date,
}

impl Vacation {
    #[inline]
    pub fn to_submitted(&self) -> SubmittedVacation {
        SubmittedVacation::new(self.id, DateRange::new(self.start_date, self.end_date))
    }
}

fn to_submitted(vacations: &[Vacation]) -> Vec<SubmittedVacation> {
    vacations.iter().map(Vacation::to_submitted).collect()
}

/// Request payload replacing the institution-wide vacations.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SyncInstitutionVacations {
    /// The complete set of institution vacations.
    #[validate(nested, length(max = 366))]
    pub vacations: Vec<Vacation>,
}

impl SyncInstitutionVacations {
    pub fn submitted(&self) -> Vec<SubmittedVacation> {
        to_submitted(&self.vacations)
    }
}

/// Request payload replacing a member's personal vacations and the
/// institution vacations that do not apply to them.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SyncInstitutionUserVacations {
    /// The complete set of personal vacations.
    #[validate(nested, length(max = 366))]
    pub vacations: Vec<Vacation>,
    /// Institution vacations excluded for this member.
    #[serde(default)]
    pub excluded_institution_vacation_ids: Vec<Uuid>,
}

impl SyncInstitutionUserVacations {
    pub fn submitted(&self) -> Vec<SubmittedVacation> {
        to_submitted(&self.vacations)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn reversed_range_fails_validation() {
        let request = SyncInstitutionVacations {
            vacations: vec![Vacation {
                id: None,
                start_date: date(2024, 7, 10),
                end_date: date(2024, 7, 1),
            }],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn deserializes_iso_dates() -> anyhow::Result<()> {
        let request: SyncInstitutionUserVacations = serde_json::from_str(
            r#"{
                "vacations": [{"startDate": "2024-07-01", "endDate": "2024-07-14"}],
                "excludedInstitutionVacationIds": []
            }"#,
        )?;

        assert!(request.validate().is_ok());
        let submitted = request.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].range.end_date, date(2024, 7, 14));
        assert!(submitted[0].id.is_none());
        Ok(())
    }
}
