//! Institution model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::institutions;

/// Institution model representing a tenant of the authorization service.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = institutions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Institution {
    /// Unique institution identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Abbreviation of at most three characters.
    pub short_name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Address of the institution logo.
    pub logo_url: Option<String>,
    /// Timestamp when the institution was created.
    pub created_at: Timestamp,
    /// Timestamp when the institution was last updated.
    pub updated_at: Timestamp,
    /// Timestamp of soft deletion.
    pub deleted_at: Option<Timestamp>,
}

/// Data for creating a new institution.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = institutions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewInstitution {
    pub name: String,
    pub short_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
}

/// Data for updating an institution.
///
/// Nullable columns use `Option<Option<_>>` so `Some(None)` clears them.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = institutions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateInstitution {
    pub name: Option<String>,
    pub short_name: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub logo_url: Option<Option<String>>,
}

impl Institution {
    /// Returns whether the institution has been soft deleted.
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
