//! Institution repository.

use std::future::Future;

use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::civil::Date;
use uuid::Uuid;

use crate::model::{Institution, NewInstitution, UpdateInstitution};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for institution database operations.
pub trait InstitutionRepository {
    /// Creates a new institution.
    ///
    /// Callers create the root role in the same transaction.
    fn create_institution(
        &mut self,
        institution: NewInstitution,
    ) -> impl Future<Output = PgResult<Institution>> + Send;

    /// Finds a non-deleted institution by id.
    fn find_institution(
        &mut self,
        institution_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Institution>>> + Send;

    /// Applies partial changes to an institution.
    fn update_institution(
        &mut self,
        institution_id: Uuid,
        changes: UpdateInstitution,
    ) -> impl Future<Output = PgResult<Institution>> + Send;

    /// Lists institutions where the person identified by `pic` has an active
    /// membership on `today`.
    fn list_institutions_for_pic(
        &mut self,
        pic: &str,
        today: Date,
    ) -> impl Future<Output = PgResult<Vec<Institution>>> + Send;
}

impl InstitutionRepository for PgConnection {
    async fn create_institution(&mut self, institution: NewInstitution) -> PgResult<Institution> {
        use schema::institutions;

        let institution = diesel::insert_into(institutions::table)
            .values(&institution)
            .returning(Institution::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(institution)
    }

    async fn find_institution(&mut self, institution_id: Uuid) -> PgResult<Option<Institution>> {
        use schema::institutions::dsl::*;

        let institution = institutions
            .filter(id.eq(institution_id))
            .filter(deleted_at.is_null())
            .select(Institution::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(institution)
    }

    async fn update_institution(
        &mut self,
        institution_id: Uuid,
        changes: UpdateInstitution,
    ) -> PgResult<Institution> {
        use schema::institutions::dsl::*;

        let institution = diesel::update(institutions)
            .filter(id.eq(institution_id))
            .filter(deleted_at.is_null())
            .set((&changes, updated_at.eq(now)))
            .returning(Institution::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(institution)
    }

    async fn list_institutions_for_pic(
        &mut self,
        pic: &str,
        today: Date,
    ) -> PgResult<Vec<Institution>> {
        use schema::{institution_users, institutions, users};

        let today = jiff_diesel::Date::from(today);
        let list = institutions::table
            .inner_join(institution_users::table.inner_join(users::table))
            .filter(users::personal_identification_code.eq(pic))
            .filter(users::deleted_at.is_null())
            .filter(institution_users::deleted_at.is_null())
            .filter(institution_users::archived_at.is_null())
            .filter(
                institution_users::deactivation_date
                    .is_null()
                    .or(institution_users::deactivation_date
                        .assume_not_null()
                        .gt(today)),
            )
            .filter(institutions::deleted_at.is_null())
            .select(Institution::as_select())
            .order(institutions::name.asc())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(list)
    }
}
