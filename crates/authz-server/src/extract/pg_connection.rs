use authz_postgres::{PgClient, PgConn};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut};

use crate::handler::Error;

/// A pooled database connection held for the duration of the handler.
///
/// Declare it after the authentication and path extractors: requests those
/// reject never wait for the pool.
///
/// ```rust,ignore
/// async fn list_departments(
///     AuthState(auth): AuthState,
///     Path(path): Path<InstitutionPathParams>,
///     PgPool(mut conn): PgPool,
/// ) -> Result<Json<Vec<DepartmentResponse>>> {
///     let departments = conn.list_departments(path.institution_id).await?;
///     // ...
/// }
/// ```
#[derive(Debug, Deref, DerefMut)]
pub struct PgPool(pub PgConn);

impl<S> FromRequestParts<S> for PgPool
where
    PgClient: FromRef<S>,
    S: Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(_: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let conn = PgClient::from_ref(state).get_connection().await?;
        Ok(Self(conn))
    }
}

impl aide::OperationInput for PgPool {}
