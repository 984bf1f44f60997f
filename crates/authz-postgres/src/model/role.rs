//! Role model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::roles;

/// Name of the role created together with every institution.
pub const ROOT_ROLE_NAME: &str = "ROOT";

/// A named set of privileges within an institution.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Role {
    pub id: Uuid,
    pub institution_id: Uuid,
    pub name: String,
    /// Whether this is the institution's root role.
    pub is_root: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Data for creating a new role.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewRole {
    pub institution_id: Uuid,
    pub name: String,
    pub is_root: bool,
}

impl NewRole {
    /// Creates a regular role.
    pub fn new(institution_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            institution_id,
            name: name.into(),
            is_root: false,
        }
    }

    /// Creates the root role of an institution.
    pub fn root(institution_id: Uuid) -> Self {
        Self {
            institution_id,
            name: ROOT_ROLE_NAME.to_owned(),
            is_root: true,
        }
    }
}

/// Data for updating a role.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateRole {
    pub name: Option<String>,
    pub deleted_at: Option<Option<Timestamp>>,
}
