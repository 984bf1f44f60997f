//! User repository.

use std::future::Future;

use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewUser, UpdateUser, User};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for user database operations.
pub trait UserRepository {
    /// Creates a new user.
    fn create_user(&mut self, user: NewUser) -> impl Future<Output = PgResult<User>> + Send;

    /// Finds a user by id.
    fn find_user(&mut self, user_id: Uuid) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Finds a user by personal identification code.
    fn find_user_by_pic(
        &mut self,
        pic: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Loads the users matching any of the given codes.
    fn find_users_by_pics(
        &mut self,
        pics: &[String],
    ) -> impl Future<Output = PgResult<Vec<User>>> + Send;

    /// Loads users by id.
    fn find_users_by_ids(
        &mut self,
        user_ids: &[Uuid],
    ) -> impl Future<Output = PgResult<Vec<User>>> + Send;

    /// Updates a user's names.
    fn update_user(
        &mut self,
        user_id: Uuid,
        changes: UpdateUser,
    ) -> impl Future<Output = PgResult<User>> + Send;
}

impl UserRepository for PgConnection {
    async fn create_user(&mut self, user: NewUser) -> PgResult<User> {
        use schema::users;

        let user = diesel::insert_into(users::table)
            .values(&user)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(user)
    }

    async fn find_user(&mut self, user_id: Uuid) -> PgResult<Option<User>> {
        use schema::users::dsl::*;

        let user = users
            .filter(id.eq(user_id))
            .filter(deleted_at.is_null())
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(user)
    }

    async fn find_user_by_pic(&mut self, pic: &str) -> PgResult<Option<User>> {
        use schema::users::dsl::*;

        let user = users
            .filter(personal_identification_code.eq(pic))
            .filter(deleted_at.is_null())
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(user)
    }

    async fn find_users_by_pics(&mut self, pics: &[String]) -> PgResult<Vec<User>> {
        use schema::users::dsl::*;

        let list = users
            .filter(personal_identification_code.eq_any(pics))
            .filter(deleted_at.is_null())
            .select(User::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(list)
    }

    async fn find_users_by_ids(&mut self, user_ids: &[Uuid]) -> PgResult<Vec<User>> {
        use schema::users::dsl::*;

        let list = users
            .filter(id.eq_any(user_ids))
            .select(User::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(list)
    }

    async fn update_user(&mut self, user_id: Uuid, changes: UpdateUser) -> PgResult<User> {
        use schema::users::dsl::*;

        let user = diesel::update(users)
            .filter(id.eq(user_id))
            .filter(deleted_at.is_null())
            .set((&changes, updated_at.eq(now)))
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(user)
    }
}
