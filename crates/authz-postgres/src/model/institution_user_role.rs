//! Role assignment model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::institution_user_roles;

/// Assignment of a role to an institution user.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = institution_user_roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InstitutionUserRole {
    pub institution_user_id: Uuid,
    pub role_id: Uuid,
    pub created_at: Timestamp,
}

/// Data for assigning a role.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = institution_user_roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewInstitutionUserRole {
    pub institution_user_id: Uuid,
    pub role_id: Uuid,
}
