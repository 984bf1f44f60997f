//! Privilege catalog model.

use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::privileges;
use crate::types::PrivilegeKey;

/// Catalog entry for a [`PrivilegeKey`]; rows are seeded by migrations.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = privileges)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Privilege {
    pub id: Uuid,
    pub key: PrivilegeKey,
    pub description: String,
}
