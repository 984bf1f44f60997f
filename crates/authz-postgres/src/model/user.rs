//! User model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::users;

/// A natural person identified by their Estonian personal identification code.
///
/// Users exist independently of institutions; memberships live in
/// [`InstitutionUser`](super::InstitutionUser).
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub personal_identification_code: String,
    pub forename: String,
    pub surname: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Data for creating a new user.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    pub personal_identification_code: String,
    pub forename: String,
    pub surname: String,
}

/// Data for updating a user's names.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateUser {
    pub forename: Option<String>,
    pub surname: Option<String>,
}

impl User {
    /// Returns the forename and surname joined by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.forename, self.surname)
    }
}

impl UpdateUser {
    /// Returns whether the changeset has nothing to write.
    pub fn is_empty(&self) -> bool {
        self.forename.is_none() && self.surname.is_none()
    }
}
