//! Role privilege grant model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::privilege_roles;

/// Grant of a privilege to a role.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = privilege_roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PrivilegeRole {
    pub role_id: Uuid,
    pub privilege_id: Uuid,
    pub created_at: Timestamp,
}

/// Data for granting a privilege to a role.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = privilege_roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewPrivilegeRole {
    pub role_id: Uuid,
    pub privilege_id: Uuid,
}
