//! Institution vacation exclusion model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::institution_vacation_exclusions;

/// Marks an institution vacation as not applying to one institution user.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = institution_vacation_exclusions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InstitutionVacationExclusion {
    pub id: Uuid,
    pub institution_user_id: Uuid,
    pub institution_vacation_id: Uuid,
    pub created_at: Timestamp,
}

/// Data for creating an exclusion.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = institution_vacation_exclusions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewInstitutionVacationExclusion {
    pub institution_user_id: Uuid,
    pub institution_vacation_id: Uuid,
}
