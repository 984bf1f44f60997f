//! Vacation repository for institution and personal vacations and exclusions.
//!
//! The `apply_*` methods write a reconciled plan: soft deletes first, then
//! updates, then inserts. Callers run them inside a transaction together with
//! the read that produced the plan.

use std::future::Future;

use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{
    InstitutionUserVacation, InstitutionVacation, InstitutionVacationExclusion,
    NewInstitutionUserVacation, NewInstitutionVacation, NewInstitutionVacationExclusion,
    UpdateInstitutionUserVacation, UpdateInstitutionVacation,
};
use crate::types::{ExclusionSyncPlan, VacationSyncPlan};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for vacation database operations.
pub trait VacationRepository {
    /// Lists the institution's vacations ordered by start date.
    fn list_institution_vacations(
        &mut self,
        institution_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<InstitutionVacation>>> + Send;

    /// Writes a reconciled plan for institution vacations.
    fn apply_institution_vacation_plan(
        &mut self,
        institution_id: Uuid,
        plan: &VacationSyncPlan,
    ) -> impl Future<Output = PgResult<()>> + Send;

    /// Lists the personal vacations of an institution user.
    fn list_institution_user_vacations(
        &mut self,
        institution_user_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<InstitutionUserVacation>>> + Send;

    /// Writes a reconciled plan for personal vacations.
    fn apply_institution_user_vacation_plan(
        &mut self,
        institution_user_id: Uuid,
        plan: &VacationSyncPlan,
    ) -> impl Future<Output = PgResult<()>> + Send;

    /// Lists the institution vacations excluded for an institution user.
    fn list_vacation_exclusions(
        &mut self,
        institution_user_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<InstitutionVacationExclusion>>> + Send;

    /// Writes a reconciled exclusion plan.
    fn apply_vacation_exclusion_plan(
        &mut self,
        institution_user_id: Uuid,
        plan: &ExclusionSyncPlan,
    ) -> impl Future<Output = PgResult<()>> + Send;
}

impl VacationRepository for PgConnection {
    async fn list_institution_vacations(
        &mut self,
        inst_id: Uuid,
    ) -> PgResult<Vec<InstitutionVacation>> {
        use schema::institution_vacations::dsl::*;

        let list = institution_vacations
            .filter(institution_id.eq(inst_id))
            .filter(deleted_at.is_null())
            .select(InstitutionVacation::as_select())
            .order((start_date.asc(), end_date.asc()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(list)
    }

    async fn apply_institution_vacation_plan(
        &mut self,
        inst_id: Uuid,
        plan: &VacationSyncPlan,
    ) -> PgResult<()> {
        use schema::institution_vacations::dsl::*;

        if !plan.deletes.is_empty() {
            diesel::update(institution_vacations)
                .filter(institution_id.eq(inst_id))
                .filter(id.eq_any(&plan.deletes))
                .filter(deleted_at.is_null())
                .set(deleted_at.eq(now))
                .execute(self)
                .await
                .map_err(PgError::from)?;
        }

        for (vacation_id, range) in &plan.updates {
            diesel::update(institution_vacations)
                .filter(institution_id.eq(inst_id))
                .filter(id.eq(*vacation_id))
                .set((
                    &UpdateInstitutionVacation::with_range(*range),
                    updated_at.eq(now),
                ))
                .execute(self)
                .await
                .map_err(PgError::from)?;
        }

        if !plan.inserts.is_empty() {
            let rows: Vec<NewInstitutionVacation> = plan
                .inserts
                .iter()
                .map(|range| NewInstitutionVacation::new(inst_id, *range))
                .collect();

            diesel::insert_into(institution_vacations)
                .values(&rows)
                .execute(self)
                .await
                .map_err(PgError::from)?;
        }

        Ok(())
    }

    async fn list_institution_user_vacations(
        &mut self,
        member_id: Uuid,
    ) -> PgResult<Vec<InstitutionUserVacation>> {
        use schema::institution_user_vacations::dsl::*;

        let list = institution_user_vacations
            .filter(institution_user_id.eq(member_id))
            .filter(deleted_at.is_null())
            .select(InstitutionUserVacation::as_select())
            .order((start_date.asc(), end_date.asc()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(list)
    }

    async fn apply_institution_user_vacation_plan(
        &mut self,
        member_id: Uuid,
        plan: &VacationSyncPlan,
    ) -> PgResult<()> {
        use schema::institution_user_vacations::dsl::*;

        if !plan.deletes.is_empty() {
            diesel::update(institution_user_vacations)
                .filter(institution_user_id.eq(member_id))
                .filter(id.eq_any(&plan.deletes))
                .filter(deleted_at.is_null())
                .set(deleted_at.eq(now))
                .execute(self)
                .await
                .map_err(PgError::from)?;
        }

        for (vacation_id, range) in &plan.updates {
            diesel::update(institution_user_vacations)
                .filter(institution_user_id.eq(member_id))
                .filter(id.eq(*vacation_id))
                .set((
                    &UpdateInstitutionUserVacation::with_range(*range),
                    updated_at.eq(now),
                ))
                .execute(self)
                .await
                .map_err(PgError::from)?;
        }

        if !plan.inserts.is_empty() {
            let rows: Vec<NewInstitutionUserVacation> = plan
                .inserts
                .iter()
                .map(|range| NewInstitutionUserVacation::new(member_id, *range))
                .collect();

            diesel::insert_into(institution_user_vacations)
                .values(&rows)
                .execute(self)
                .await
                .map_err(PgError::from)?;
        }

        Ok(())
    }

    async fn list_vacation_exclusions(
        &mut self,
        member_id: Uuid,
    ) -> PgResult<Vec<InstitutionVacationExclusion>> {
        use schema::{institution_vacation_exclusions, institution_vacations};

        let list = institution_vacation_exclusions::table
            .inner_join(institution_vacations::table)
            .filter(institution_vacation_exclusions::institution_user_id.eq(member_id))
            .filter(institution_vacations::deleted_at.is_null())
            .select(InstitutionVacationExclusion::as_select())
            .order(institution_vacations::start_date.asc())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(list)
    }

    async fn apply_vacation_exclusion_plan(
        &mut self,
        member_id: Uuid,
        plan: &ExclusionSyncPlan,
    ) -> PgResult<()> {
        use schema::institution_vacation_exclusions::dsl::*;

        if !plan.deletes.is_empty() {
            diesel::delete(institution_vacation_exclusions)
                .filter(institution_user_id.eq(member_id))
                .filter(institution_vacation_id.eq_any(&plan.deletes))
                .execute(self)
                .await
                .map_err(PgError::from)?;
        }

        if !plan.inserts.is_empty() {
            let rows: Vec<NewInstitutionVacationExclusion> = plan
                .inserts
                .iter()
                .map(|&vacation_id| NewInstitutionVacationExclusion {
                    institution_user_id: member_id,
                    institution_vacation_id: vacation_id,
                })
                .collect();

            diesel::insert_into(institution_vacation_exclusions)
                .values(&rows)
                .on_conflict_do_nothing()
                .execute(self)
                .await
                .map_err(PgError::from)?;
        }

        Ok(())
    }
}
