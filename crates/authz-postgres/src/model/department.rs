//! Department model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::departments;

/// Department within an institution.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Department {
    /// Unique department identifier.
    pub id: Uuid,
    /// Owning institution.
    pub institution_id: Uuid,
    /// Name, unique per institution among non-deleted departments.
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Data for creating a new department.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDepartment {
    pub institution_id: Uuid,
    pub name: String,
}

impl NewDepartment {
    /// Creates a new department for the institution.
    pub fn new(institution_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            institution_id,
            name: name.into(),
        }
    }
}

/// Data for updating a department.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateDepartment {
    pub name: Option<String>,
    pub deleted_at: Option<Option<Timestamp>>,
}
