//! Privilege catalog repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::Privilege;
use crate::types::PrivilegeKey;
use crate::{PgConnection, PgError, PgResult, schema};

/// Read access to the seeded privilege catalog.
pub trait PrivilegeRepository {
    /// Lists every privilege ordered by key.
    fn list_privileges(&mut self) -> impl Future<Output = PgResult<Vec<Privilege>>> + Send;

    /// Loads the catalog entries for the given keys.
    fn find_privileges_by_keys(
        &mut self,
        keys: &[PrivilegeKey],
    ) -> impl Future<Output = PgResult<Vec<Privilege>>> + Send;
}

impl PrivilegeRepository for PgConnection {
    async fn list_privileges(&mut self) -> PgResult<Vec<Privilege>> {
        use schema::privileges::dsl::*;

        let list = privileges
            .select(Privilege::as_select())
            .order(key.asc())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(list)
    }

    async fn find_privileges_by_keys(&mut self, keys: &[PrivilegeKey]) -> PgResult<Vec<Privilege>> {
        use schema::privileges::dsl::*;

        let list = privileges
            .filter(key.eq_any(keys))
            .select(Privilege::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(list)
    }
}
