//! Institution user model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::{Date, Timestamp};
use uuid::Uuid;

use crate::schema::institution_users;
use crate::types::{InstitutionUserStatus, local_today};

/// Membership of a user in an institution.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = institution_users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InstitutionUser {
    /// Unique membership identifier.
    pub id: Uuid,
    /// Institution the user belongs to.
    pub institution_id: Uuid,
    /// The member.
    pub user_id: Uuid,
    /// Optional department within the institution.
    pub department_id: Option<Uuid>,
    /// Work email.
    pub email: String,
    /// Work phone.
    pub phone: Option<String>,
    /// When the membership was archived.
    pub archived_at: Option<Timestamp>,
    /// Day from which the membership is deactivated.
    pub deactivation_date: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Data for creating a new institution user.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = institution_users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewInstitutionUser {
    pub institution_id: Uuid,
    pub user_id: Uuid,
    pub department_id: Option<Uuid>,
    pub email: String,
    pub phone: Option<String>,
}

/// Data for updating an institution user.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = institution_users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateInstitutionUser {
    pub department_id: Option<Option<Uuid>>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub archived_at: Option<Option<Timestamp>>,
    pub deactivation_date: Option<Option<Date>>,
    pub deleted_at: Option<Option<Timestamp>>,
}

impl InstitutionUser {
    /// Derives the status at the instant `now`.
    pub fn status_at(&self, now: jiff::Timestamp) -> InstitutionUserStatus {
        InstitutionUserStatus::derive(
            self.archived_at.map(jiff::Timestamp::from),
            self.deactivation_date.map(jiff::civil::Date::from),
            now,
        )
    }

    /// Derives the current status.
    #[inline]
    pub fn status(&self) -> InstitutionUserStatus {
        self.status_at(jiff::Timestamp::now())
    }

    /// Returns whether a deactivation date lies in the future.
    pub fn has_scheduled_deactivation(&self) -> bool {
        self.deactivation_date
            .map(jiff::civil::Date::from)
            .is_some_and(|date| date > local_today())
    }
}
