//! Institution-wide vacation model.

use diesel::prelude::*;
use jiff_diesel::{Date, Timestamp};
use uuid::Uuid;

use crate::schema::institution_vacations;
use crate::types::DateRange;

/// Vacation applying to every member of an institution.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = institution_vacations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InstitutionVacation {
    pub id: Uuid,
    pub institution_id: Uuid,
    pub start_date: Date,
    pub end_date: Date,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Data for creating a new institution vacation.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = institution_vacations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewInstitutionVacation {
    pub institution_id: Uuid,
    pub start_date: Date,
    pub end_date: Date,
}

impl NewInstitutionVacation {
    /// Creates a new vacation covering `range`.
    pub fn new(institution_id: Uuid, range: DateRange) -> Self {
        Self {
            institution_id,
            start_date: range.start_date.into(),
            end_date: range.end_date.into(),
        }
    }
}

/// Data for updating an institution vacation.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = institution_vacations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateInstitutionVacation {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub deleted_at: Option<Option<Timestamp>>,
}

impl UpdateInstitutionVacation {
    /// Creates a changeset that moves the vacation to `range`.
    pub fn with_range(range: DateRange) -> Self {
        Self {
            start_date: Some(range.start_date.into()),
            end_date: Some(range.end_date.into()),
            ..Default::default()
        }
    }
}

impl InstitutionVacation {
    /// Returns the covered range.
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date.into(), self.end_date.into())
    }
}
