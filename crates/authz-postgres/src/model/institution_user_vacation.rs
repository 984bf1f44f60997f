//! Institution user vacation model.

use diesel::prelude::*;
use jiff_diesel::{Date, Timestamp};
use uuid::Uuid;

use crate::schema::institution_user_vacations;
use crate::types::DateRange;

/// Personal vacation of an institution user.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = institution_user_vacations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InstitutionUserVacation {
    pub id: Uuid,
    pub institution_user_id: Uuid,
    pub start_date: Date,
    pub end_date: Date,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Data for creating a new institution user vacation.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = institution_user_vacations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewInstitutionUserVacation {
    pub institution_user_id: Uuid,
    pub start_date: Date,
    pub end_date: Date,
}

impl NewInstitutionUserVacation {
    /// Creates a new vacation covering `range`.
    pub fn new(institution_user_id: Uuid, range: DateRange) -> Self {
        Self {
            institution_user_id,
            start_date: range.start_date.into(),
            end_date: range.end_date.into(),
        }
    }
}

/// Data for updating an institution user vacation.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = institution_user_vacations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateInstitutionUserVacation {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub deleted_at: Option<Option<Timestamp>>,
}

impl UpdateInstitutionUserVacation {
    /// Creates a changeset that moves the vacation to `range`.
    pub fn with_range(range: DateRange) -> Self {
        Self {
            start_date: Some(range.start_date.into()),
            end_date: Some(range.end_date.into()),
            ..Default::default()
        }
    }
}

impl InstitutionUserVacation {
    /// Returns the covered range.
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date.into(), self.end_date.into())
    }
}
