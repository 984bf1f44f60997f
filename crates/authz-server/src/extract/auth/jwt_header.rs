//! Bearer token verification.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;
use derive_more::{Deref, Into};

use super::AuthClaims;
use crate::handler::{Error, ErrorKind};
use crate::service::AuthKeys;

type BearerHeader = TypedHeader<Authorization<Bearer>>;

/// Claims of an `Authorization: Bearer` token that passed verification
/// against [`AuthKeys`].
///
/// Verified claims are cached in the request extensions, so the token is
/// checked once however many extractors ask for it.
#[must_use]
#[derive(Debug, Clone, Deref, Into)]
pub struct AuthHeader(AuthClaims);

fn header_error(reason: &TypedHeaderRejectionReason) -> Error<'static> {
    let error = match reason {
        TypedHeaderRejectionReason::Missing => ErrorKind::MissingAuthToken
            .with_context("Send the access token as 'Authorization: Bearer <token>'"),
        _ => ErrorKind::MalformedAuthToken
            .with_context("The Authorization header does not hold a bearer token"),
    };
    error.with_resource("authentication")
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Sync + Send,
    AuthKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(cached) = parts.extensions.get::<Self>() {
            return Ok(cached.clone());
        }

        let bearer = BearerHeader::from_request_parts(parts, state)
            .await
            .map_err(|rejection| header_error(rejection.reason()))?;
        let claims = AuthClaims::from_header(bearer, &AuthKeys::from_ref(state))?;

        let verified = Self(claims);
        parts.extensions.insert(verified.clone());
        Ok(verified)
    }
}

impl aide::OperationInput for AuthHeader {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_malformed_headers_differ() {
        let missing = header_error(&TypedHeaderRejectionReason::Missing);
        assert_eq!(missing.kind(), ErrorKind::MissingAuthToken);
        assert_eq!(missing.resource(), Some("authentication"));
    }
}
