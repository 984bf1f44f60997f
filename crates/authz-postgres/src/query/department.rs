//! Department repository.

use std::future::Future;

use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{Department, NewDepartment, UpdateDepartment};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for department database operations.
pub trait DepartmentRepository {
    /// Creates a new department.
    fn create_department(
        &mut self,
        department: NewDepartment,
    ) -> impl Future<Output = PgResult<Department>> + Send;

    /// Finds a department within an institution.
    fn find_department(
        &mut self,
        institution_id: Uuid,
        department_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Department>>> + Send;

    /// Lists the institution's departments ordered by name.
    fn list_departments(
        &mut self,
        institution_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<Department>>> + Send;

    /// Renames a department.
    fn update_department(
        &mut self,
        institution_id: Uuid,
        department_id: Uuid,
        changes: UpdateDepartment,
    ) -> impl Future<Output = PgResult<Department>> + Send;

    /// Soft deletes a department and detaches its members.
    fn delete_department(
        &mut self,
        institution_id: Uuid,
        department_id: Uuid,
    ) -> impl Future<Output = PgResult<()>> + Send;
}

impl DepartmentRepository for PgConnection {
    async fn create_department(&mut self, department: NewDepartment) -> PgResult<Department> {
        use schema::departments;

        let department = diesel::insert_into(departments::table)
            .values(&department)
            .returning(Department::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(department)
    }

    async fn find_department(
        &mut self,
        inst_id: Uuid,
        department_id: Uuid,
    ) -> PgResult<Option<Department>> {
        use schema::departments::dsl::*;

        let department = departments
            .filter(id.eq(department_id))
            .filter(institution_id.eq(inst_id))
            .filter(deleted_at.is_null())
            .select(Department::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(department)
    }

    async fn list_departments(&mut self, inst_id: Uuid) -> PgResult<Vec<Department>> {
        use schema::departments::dsl::*;

        let list = departments
            .filter(institution_id.eq(inst_id))
            .filter(deleted_at.is_null())
            .select(Department::as_select())
            .order(name.asc())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(list)
    }

    async fn update_department(
        &mut self,
        inst_id: Uuid,
        department_id: Uuid,
        changes: UpdateDepartment,
    ) -> PgResult<Department> {
        use schema::departments::dsl::*;

        let department = diesel::update(departments)
            .filter(id.eq(department_id))
            .filter(institution_id.eq(inst_id))
            .filter(deleted_at.is_null())
            .set((&changes, updated_at.eq(now)))
            .returning(Department::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(department)
    }

    async fn delete_department(&mut self, inst_id: Uuid, department_id: Uuid) -> PgResult<()> {
        use schema::{departments, institution_users};

        diesel::update(institution_users::table)
            .filter(institution_users::department_id.eq(department_id))
            .set(institution_users::department_id.eq(None::<Uuid>))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        diesel::update(departments::table)
            .filter(departments::id.eq(department_id))
            .filter(departments::institution_id.eq(inst_id))
            .filter(departments::deleted_at.is_null())
            .set(departments::deleted_at.eq(now))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }
}
