//! Role repository, including privilege grants.

use std::collections::HashMap;
use std::future::Future;

use diesel::dsl::{self, now};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewPrivilegeRole, NewRole, Role, UpdateRole};
use crate::types::PrivilegeKey;
use crate::{PgConnection, PgError, PgResult, schema};

/// A role together with the keys of its granted privileges.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleWithPrivileges {
    pub role: Role,
    pub privileges: Vec<PrivilegeKey>,
}

/// The institution's root role row, locked until the transaction ends.
type LockRootRole = dsl::ForUpdate<
    dsl::Select<
        dsl::Filter<
            dsl::Filter<
                dsl::Filter<schema::roles::table, dsl::Eq<schema::roles::institution_id, Uuid>>,
                dsl::Eq<schema::roles::is_root, bool>,
            >,
            dsl::IsNull<schema::roles::deleted_at>,
        >,
        dsl::AsSelect<Role, Pg>,
    >,
>;

fn lock_root_role_query(inst_id: Uuid) -> LockRootRole {
    use schema::roles::dsl::*;

    roles
        .filter(institution_id.eq(inst_id))
        .filter(is_root.eq(true))
        .filter(deleted_at.is_null())
        .select(Role::as_select())
        .for_update()
}

/// Repository for role database operations.
pub trait RoleRepository {
    /// Creates a new role.
    fn create_role(&mut self, role: NewRole) -> impl Future<Output = PgResult<Role>> + Send;

    /// Finds a role within an institution.
    fn find_role(
        &mut self,
        institution_id: Uuid,
        role_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Role>>> + Send;

    /// Finds the institution's root role and locks its row until the
    /// transaction ends, serializing changes to who holds it.
    fn lock_root_role(
        &mut self,
        institution_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Role>>> + Send;

    /// Loads roles of the institution by id, skipping unknown ids.
    fn find_roles_by_ids(
        &mut self,
        institution_id: Uuid,
        role_ids: &[Uuid],
    ) -> impl Future<Output = PgResult<Vec<Role>>> + Send;

    /// Loads roles of the institution by name, skipping unknown names.
    fn find_roles_by_names(
        &mut self,
        institution_id: Uuid,
        names: &[String],
    ) -> impl Future<Output = PgResult<Vec<Role>>> + Send;

    /// Lists the institution's roles with their privileges, ordered by name.
    fn list_roles(
        &mut self,
        institution_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<RoleWithPrivileges>>> + Send;

    /// Lists the privilege keys granted to a role.
    fn list_role_privileges(
        &mut self,
        role_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<PrivilegeKey>>> + Send;

    /// Replaces every privilege granted to a role.
    fn replace_role_privileges(
        &mut self,
        role_id: Uuid,
        keys: &[PrivilegeKey],
    ) -> impl Future<Output = PgResult<Vec<PrivilegeKey>>> + Send;

    /// Renames a role.
    fn update_role(
        &mut self,
        institution_id: Uuid,
        role_id: Uuid,
        changes: UpdateRole,
    ) -> impl Future<Output = PgResult<Role>> + Send;

    /// Soft deletes a role and removes its assignments.
    fn delete_role(
        &mut self,
        institution_id: Uuid,
        role_id: Uuid,
    ) -> impl Future<Output = PgResult<()>> + Send;
}

impl RoleRepository for PgConnection {
    async fn create_role(&mut self, role: NewRole) -> PgResult<Role> {
        use schema::roles;

        let role = diesel::insert_into(roles::table)
            .values(&role)
            .returning(Role::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(role)
    }

    async fn find_role(&mut self, inst_id: Uuid, role_id: Uuid) -> PgResult<Option<Role>> {
        use schema::roles::dsl::*;

        let role = roles
            .filter(id.eq(role_id))
            .filter(institution_id.eq(inst_id))
            .filter(deleted_at.is_null())
            .select(Role::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(role)
    }

    async fn lock_root_role(&mut self, inst_id: Uuid) -> PgResult<Option<Role>> {
        let locked: Vec<Role> = lock_root_role_query(inst_id)
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(locked.into_iter().next())
    }

    async fn find_roles_by_ids(&mut self, inst_id: Uuid, role_ids: &[Uuid]) -> PgResult<Vec<Role>> {
        use schema::roles::dsl::*;

        let list = roles
            .filter(id.eq_any(role_ids))
            .filter(institution_id.eq(inst_id))
            .filter(deleted_at.is_null())
            .select(Role::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(list)
    }

    async fn find_roles_by_names(&mut self, inst_id: Uuid, names: &[String]) -> PgResult<Vec<Role>> {
        use schema::roles::dsl::*;

        let list = roles
            .filter(name.eq_any(names))
            .filter(institution_id.eq(inst_id))
            .filter(deleted_at.is_null())
            .select(Role::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(list)
    }

    async fn list_roles(&mut self, inst_id: Uuid) -> PgResult<Vec<RoleWithPrivileges>> {
        use schema::{privilege_roles, privileges, roles};

        let role_list = roles::table
            .filter(roles::institution_id.eq(inst_id))
            .filter(roles::deleted_at.is_null())
            .select(Role::as_select())
            .order((roles::is_root.desc(), roles::name.asc()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        let role_ids: Vec<Uuid> = role_list.iter().map(|role| role.id).collect();
        let grants: Vec<(Uuid, PrivilegeKey)> = privilege_roles::table
            .inner_join(privileges::table)
            .filter(privilege_roles::role_id.eq_any(&role_ids))
            .select((privilege_roles::role_id, privileges::key))
            .order(privileges::key.asc())
            .load(self)
            .await
            .map_err(PgError::from)?;

        let mut by_role: HashMap<Uuid, Vec<PrivilegeKey>> = HashMap::new();
        for (role_id, key) in grants {
            by_role.entry(role_id).or_default().push(key);
        }

        let list = role_list
            .into_iter()
            .map(|role| RoleWithPrivileges {
                privileges: by_role.remove(&role.id).unwrap_or_default(),
                role,
            })
            .collect();

        Ok(list)
    }

    async fn list_role_privileges(&mut self, role_id: Uuid) -> PgResult<Vec<PrivilegeKey>> {
        use schema::{privilege_roles, privileges};

        let keys = privilege_roles::table
            .inner_join(privileges::table)
            .filter(privilege_roles::role_id.eq(role_id))
            .select(privileges::key)
            .order(privileges::key.asc())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(keys)
    }

    async fn replace_role_privileges(
        &mut self,
        role_id: Uuid,
        keys: &[PrivilegeKey],
    ) -> PgResult<Vec<PrivilegeKey>> {
        use schema::{privilege_roles, privileges};

        diesel::delete(privilege_roles::table)
            .filter(privilege_roles::role_id.eq(role_id))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        let privilege_ids: Vec<Uuid> = privileges::table
            .filter(privileges::key.eq_any(keys))
            .select(privileges::id)
            .load(self)
            .await
            .map_err(PgError::from)?;

        let grants: Vec<NewPrivilegeRole> = privilege_ids
            .into_iter()
            .map(|privilege_id| NewPrivilegeRole {
                role_id,
                privilege_id,
            })
            .collect();

        if !grants.is_empty() {
            diesel::insert_into(privilege_roles::table)
                .values(&grants)
                .execute(self)
                .await
                .map_err(PgError::from)?;
        }

        self.list_role_privileges(role_id).await
    }

    async fn update_role(
        &mut self,
        inst_id: Uuid,
        role_id: Uuid,
        changes: UpdateRole,
    ) -> PgResult<Role> {
        use schema::roles::dsl::*;

        let role = diesel::update(roles)
            .filter(id.eq(role_id))
            .filter(institution_id.eq(inst_id))
            .filter(deleted_at.is_null())
            .set((&changes, updated_at.eq(now)))
            .returning(Role::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(role)
    }

    async fn delete_role(&mut self, inst_id: Uuid, role_id: Uuid) -> PgResult<()> {
        use schema::{institution_user_roles, roles};

        diesel::delete(institution_user_roles::table)
            .filter(institution_user_roles::role_id.eq(role_id))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        diesel::update(roles::table)
            .filter(roles::id.eq(role_id))
            .filter(roles::institution_id.eq(inst_id))
            .filter(roles::is_root.eq(false))
            .filter(roles::deleted_at.is_null())
            .set(roles::deleted_at.eq(now))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_role_row_is_locked() {
        let query = lock_root_role_query(Uuid::nil());
        let sql = diesel::debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("\"is_root\" = $"), "{sql}");
        assert!(sql.contains("FOR UPDATE"), "{sql}");
    }
}
