use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use derive_more::Deref;

use super::{AuthClaims, AuthHeader};
use crate::handler::Error;
use crate::service::AuthKeys;
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION;

/// The authenticated caller of a private handler.
///
/// Dereferences to [`AuthClaims`], which implements [`AuthProvider`]:
///
/// ```rust,ignore
/// async fn list_roles(
///     AuthState(auth): AuthState,
///     Path(path): Path<InstitutionPathParams>,
/// ) -> Result<()> {
///     auth.authorize_privilege(path.institution_id, PrivilegeKey::ViewRole)?;
///     Ok(())
/// }
/// ```
///
/// [`AuthProvider`]: super::AuthProvider
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct AuthState(pub AuthClaims);

impl<S> FromRequestParts<S> for AuthState
where
    S: Sync + Send,
    AuthKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims: AuthClaims = AuthHeader::from_request_parts(parts, state).await?.into();

        tracing::trace!(
            target: TRACING_TARGET_AUTHENTICATION,
            subject = %claims.subject,
            institution_user_id = ?claims.authz.institution_user_id,
            "caller authenticated"
        );

        Ok(Self(claims))
    }
}

impl aide::OperationInput for AuthState {}
