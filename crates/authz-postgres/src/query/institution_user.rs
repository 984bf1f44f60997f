//! Institution user repository: memberships, role assignments and the
//! status-aware listing.

use std::collections::HashMap;
use std::future::Future;

use diesel::dsl::{exists, now};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::RunQueryDsl;
use jiff::civil::Date;
use uuid::Uuid;

use crate::model::{
    InstitutionUser, NewInstitutionUser, NewInstitutionUserRole, Role, UpdateInstitutionUser,
    User,
};
use crate::schema::{institution_user_roles, institution_users, roles, users};
use crate::types::{InstitutionUserFilter, InstitutionUserStatus, OffsetPage, OffsetPagination};
use crate::{PgConnection, PgError, PgResult};

/// A membership with its user and currently assigned roles.
#[derive(Debug, Clone, PartialEq)]
pub struct InstitutionUserWithRoles {
    pub institution_user: InstitutionUser,
    pub user: User,
    pub roles: Vec<Role>,
}

type StatusCondition = Box<dyn BoxableExpression<institution_users::table, Pg, SqlType = Bool>>;

/// SQL rendition of [`InstitutionUserStatus::derive`] for a fixed `today`.
fn status_condition(status: InstitutionUserStatus, today: Date) -> StatusCondition {
    let today = jiff_diesel::Date::from(today);
    match status {
        InstitutionUserStatus::Active => Box::new(
            institution_users::archived_at.is_null().and(
                institution_users::deactivation_date
                    .is_null()
                    .or(institution_users::deactivation_date
                        .assume_not_null()
                        .gt(today)),
            ),
        ),
        InstitutionUserStatus::Deactivated => Box::new(
            institution_users::archived_at.is_null().and(
                institution_users::deactivation_date
                    .is_not_null()
                    .and(institution_users::deactivation_date
                        .assume_not_null()
                        .le(today)),
            ),
        ),
        InstitutionUserStatus::Archived => Box::new(institution_users::archived_at.is_not_null()),
    }
}

fn filtered_query(
    institution_id: Uuid,
    filter: &InstitutionUserFilter,
    today: Date,
) -> institution_users::BoxedQuery<'static, Pg> {
    let mut query = institution_users::table
        .filter(institution_users::institution_id.eq(institution_id))
        .filter(institution_users::deleted_at.is_null())
        .into_boxed();

    let mut statuses = filter.statuses.iter().copied();
    if let Some(first) = statuses.next() {
        let condition = statuses.fold(
            status_condition(first, today),
            |acc, status| -> StatusCondition { Box::new(acc.or(status_condition(status, today))) },
        );
        query = query.filter(condition);
    }

    if let Some(department_id) = filter.department_id {
        query = query.filter(institution_users::department_id.eq(department_id));
    }

    if let Some(role_id) = filter.role_id {
        query = query.filter(
            institution_users::id.eq_any(
                institution_user_roles::table
                    .filter(institution_user_roles::role_id.eq(role_id))
                    .select(institution_user_roles::institution_user_id),
            ),
        );
    }

    if let Some(pattern) = filter.search_pattern() {
        query = query.filter(
            institution_users::email.ilike(pattern.clone()).or(institution_users::user_id
                .eq_any(
                    users::table
                        .filter(
                            users::forename
                                .ilike(pattern.clone())
                                .or(users::surname.ilike(pattern.clone()))
                                .or(users::personal_identification_code.ilike(pattern)),
                        )
                        .select(users::id),
                )),
        );
    }

    query
}

/// Repository for institution user database operations.
pub trait InstitutionUserRepository {
    /// Creates a new membership.
    fn create_institution_user(
        &mut self,
        institution_user: NewInstitutionUser,
    ) -> impl Future<Output = PgResult<InstitutionUser>> + Send;

    /// Finds a membership within an institution.
    fn find_institution_user(
        &mut self,
        institution_id: Uuid,
        institution_user_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<InstitutionUser>>> + Send;

    /// Finds a membership with its user and roles.
    fn find_institution_user_with_roles(
        &mut self,
        institution_id: Uuid,
        institution_user_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<InstitutionUserWithRoles>>> + Send;

    /// Finds the non-archived membership of a user in an institution.
    fn find_unarchived_membership(
        &mut self,
        institution_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<InstitutionUser>>> + Send;

    /// Lists memberships matching `filter`, oldest first.
    ///
    /// Status filters are evaluated against `today`.
    fn list_institution_users(
        &mut self,
        institution_id: Uuid,
        filter: &InstitutionUserFilter,
        pagination: OffsetPagination,
        today: Date,
    ) -> impl Future<Output = PgResult<OffsetPage<InstitutionUserWithRoles>>> + Send;

    /// Applies partial changes to a membership.
    fn update_institution_user(
        &mut self,
        institution_user_id: Uuid,
        changes: UpdateInstitutionUser,
    ) -> impl Future<Output = PgResult<InstitutionUser>> + Send;

    /// Soft deletes a membership and removes its role assignments.
    fn delete_institution_user(
        &mut self,
        institution_user_id: Uuid,
    ) -> impl Future<Output = PgResult<()>> + Send;

    /// Lists the roles assigned to each of the given memberships.
    fn list_assigned_roles(
        &mut self,
        institution_user_ids: &[Uuid],
    ) -> impl Future<Output = PgResult<HashMap<Uuid, Vec<Role>>>> + Send;

    /// Replaces every role assigned to a membership.
    fn replace_institution_user_roles(
        &mut self,
        institution_user_id: Uuid,
        role_ids: &[Uuid],
    ) -> impl Future<Output = PgResult<()>> + Send;

    /// Removes every role assigned to a membership.
    fn remove_institution_user_roles(
        &mut self,
        institution_user_id: Uuid,
    ) -> impl Future<Output = PgResult<()>> + Send;

    /// Returns whether the membership holds the institution's root role.
    fn holds_root_role(
        &mut self,
        institution_user_id: Uuid,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    /// Counts memberships other than `excluding` that hold the root role and
    /// carry no deactivation date, past or scheduled.
    fn count_other_root_holders(
        &mut self,
        institution_id: Uuid,
        excluding: Uuid,
    ) -> impl Future<Output = PgResult<i64>> + Send;
}

impl InstitutionUserRepository for PgConnection {
    async fn create_institution_user(
        &mut self,
        institution_user: NewInstitutionUser,
    ) -> PgResult<InstitutionUser> {
        let institution_user = diesel::insert_into(institution_users::table)
            .values(&institution_user)
            .returning(InstitutionUser::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(institution_user)
    }

    async fn find_institution_user(
        &mut self,
        inst_id: Uuid,
        institution_user_id: Uuid,
    ) -> PgResult<Option<InstitutionUser>> {
        use crate::schema::institution_users::dsl::*;

        let institution_user = institution_users
            .filter(id.eq(institution_user_id))
            .filter(institution_id.eq(inst_id))
            .filter(deleted_at.is_null())
            .select(InstitutionUser::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(institution_user)
    }

    async fn find_institution_user_with_roles(
        &mut self,
        inst_id: Uuid,
        institution_user_id: Uuid,
    ) -> PgResult<Option<InstitutionUserWithRoles>> {
        let found = institution_users::table
            .inner_join(users::table)
            .filter(institution_users::id.eq(institution_user_id))
            .filter(institution_users::institution_id.eq(inst_id))
            .filter(institution_users::deleted_at.is_null())
            .select((InstitutionUser::as_select(), User::as_select()))
            .first::<(InstitutionUser, User)>(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        let Some((institution_user, user)) = found else {
            return Ok(None);
        };

        let mut assigned = self.list_assigned_roles(&[institution_user.id]).await?;
        let roles = assigned.remove(&institution_user.id).unwrap_or_default();

        Ok(Some(InstitutionUserWithRoles {
            institution_user,
            user,
            roles,
        }))
    }

    async fn find_unarchived_membership(
        &mut self,
        inst_id: Uuid,
        member_id: Uuid,
    ) -> PgResult<Option<InstitutionUser>> {
        use crate::schema::institution_users::dsl::*;

        let institution_user = institution_users
            .filter(institution_id.eq(inst_id))
            .filter(user_id.eq(member_id))
            .filter(archived_at.is_null())
            .filter(deleted_at.is_null())
            .select(InstitutionUser::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(institution_user)
    }

    async fn list_institution_users(
        &mut self,
        inst_id: Uuid,
        filter: &InstitutionUserFilter,
        pagination: OffsetPagination,
        today: Date,
    ) -> PgResult<OffsetPage<InstitutionUserWithRoles>> {
        let total = if pagination.include_count {
            let count = filtered_query(inst_id, filter, today)
                .count()
                .get_result::<i64>(self)
                .await
                .map_err(PgError::from)?;
            Some(count)
        } else {
            None
        };

        let memberships: Vec<InstitutionUser> = filtered_query(inst_id, filter, today)
            .order((institution_users::created_at.asc(), institution_users::id.asc()))
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(InstitutionUser::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        let user_ids: Vec<Uuid> = memberships.iter().map(|m| m.user_id).collect();
        let mut members: HashMap<Uuid, User> = users::table
            .filter(users::id.eq_any(&user_ids))
            .select(User::as_select())
            .load::<User>(self)
            .await
            .map_err(PgError::from)?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        let membership_ids: Vec<Uuid> = memberships.iter().map(|m| m.id).collect();
        let mut assigned = self.list_assigned_roles(&membership_ids).await?;

        let items: Vec<InstitutionUserWithRoles> = memberships
            .into_iter()
            .filter_map(|institution_user| {
                let user = members.remove(&institution_user.user_id)?;
                let roles = assigned.remove(&institution_user.id).unwrap_or_default();
                Some(InstitutionUserWithRoles {
                    institution_user,
                    user,
                    roles,
                })
            })
            .collect();

        Ok(OffsetPage::new(items, total))
    }

    async fn update_institution_user(
        &mut self,
        institution_user_id: Uuid,
        changes: UpdateInstitutionUser,
    ) -> PgResult<InstitutionUser> {
        use crate::schema::institution_users::dsl::*;

        let institution_user = diesel::update(institution_users)
            .filter(id.eq(institution_user_id))
            .filter(deleted_at.is_null())
            .set((&changes, updated_at.eq(now)))
            .returning(InstitutionUser::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(institution_user)
    }

    async fn delete_institution_user(&mut self, institution_user_id: Uuid) -> PgResult<()> {
        self.remove_institution_user_roles(institution_user_id).await?;

        diesel::update(institution_users::table)
            .filter(institution_users::id.eq(institution_user_id))
            .filter(institution_users::deleted_at.is_null())
            .set(institution_users::deleted_at.eq(now))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }

    async fn list_assigned_roles(
        &mut self,
        institution_user_ids: &[Uuid],
    ) -> PgResult<HashMap<Uuid, Vec<Role>>> {
        let rows: Vec<(Uuid, Role)> = institution_user_roles::table
            .inner_join(roles::table)
            .filter(institution_user_roles::institution_user_id.eq_any(institution_user_ids))
            .filter(roles::deleted_at.is_null())
            .select((institution_user_roles::institution_user_id, Role::as_select()))
            .order(roles::name.asc())
            .load(self)
            .await
            .map_err(PgError::from)?;

        let mut assigned: HashMap<Uuid, Vec<Role>> = HashMap::new();
        for (institution_user_id, role) in rows {
            assigned.entry(institution_user_id).or_default().push(role);
        }

        Ok(assigned)
    }

    async fn replace_institution_user_roles(
        &mut self,
        institution_user_id: Uuid,
        role_ids: &[Uuid],
    ) -> PgResult<()> {
        self.remove_institution_user_roles(institution_user_id).await?;

        let assignments: Vec<NewInstitutionUserRole> = role_ids
            .iter()
            .map(|&role_id| NewInstitutionUserRole {
                institution_user_id,
                role_id,
            })
            .collect();

        if !assignments.is_empty() {
            diesel::insert_into(institution_user_roles::table)
                .values(&assignments)
                .on_conflict_do_nothing()
                .execute(self)
                .await
                .map_err(PgError::from)?;
        }

        Ok(())
    }

    async fn remove_institution_user_roles(&mut self, institution_user_id: Uuid) -> PgResult<()> {
        diesel::delete(institution_user_roles::table)
            .filter(institution_user_roles::institution_user_id.eq(institution_user_id))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }

    async fn holds_root_role(&mut self, institution_user_id: Uuid) -> PgResult<bool> {
        let holds = diesel::select(exists(
            institution_user_roles::table
                .inner_join(roles::table)
                .filter(institution_user_roles::institution_user_id.eq(institution_user_id))
                .filter(roles::is_root.eq(true))
                .filter(roles::deleted_at.is_null()),
        ))
        .get_result::<bool>(self)
        .await
        .map_err(PgError::from)?;

        Ok(holds)
    }

    async fn count_other_root_holders(&mut self, inst_id: Uuid, excluding: Uuid) -> PgResult<i64> {
        let count = institution_user_roles::table
            .inner_join(institution_users::table)
            .inner_join(roles::table)
            .filter(roles::institution_id.eq(inst_id))
            .filter(roles::is_root.eq(true))
            .filter(roles::deleted_at.is_null())
            .filter(institution_users::id.ne(excluding))
            .filter(institution_users::deleted_at.is_null())
            .filter(institution_users::archived_at.is_null())
            .filter(institution_users::deactivation_date.is_null())
            .count()
            .get_result::<i64>(self)
            .await
            .map_err(PgError::from)?;

        Ok(count)
    }
}
