use axum::extract::{FromRequestParts, Query as AxumQuery};
use axum::http::request::Parts;
use axum_extra::extract::Query as MultiQuery;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use super::clip;
use crate::handler::{Error, ErrorKind};

/// Query string extractor that accepts repeated keys.
///
/// `?status=ACTIVE&status=ARCHIVED` fills a `Vec<InstitutionUserStatus>`.
///
/// ```rust,no_run
/// use authz_server::extract::Query;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct SearchParams {
///     search: Option<String>,
///     #[serde(default)]
///     status: Vec<String>,
/// }
///
/// async fn search(Query(params): Query<SearchParams>) {
///     let _ = (params.search, params.status);
/// }
/// ```
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Query<T>(pub T);

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        MultiQuery::<T>::from_request_parts(parts, state)
            .await
            .map(|MultiQuery(value)| Self(value))
            .map_err(|rejection| query_error(&rejection.to_string()))
    }
}

fn query_error(detail: &str) -> Error<'static> {
    tracing::debug!(target: "authz_server::extract::query", %detail, "query string rejected");

    match backticked(detail) {
        Some(field) if detail.contains("missing field") => ErrorKind::BadRequest
            .with_message(format!("Query parameter '{field}' is required")),
        Some(value) if detail.contains("unknown variant") => ErrorKind::BadRequest
            .with_message(format!("'{value}' is not an accepted value"))
            .with_context(clip(detail, 2, 200)),
        _ => ErrorKind::BadRequest
            .with_message("The query string has the wrong format")
            .with_context(clip(detail, 2, 200)),
    }
}

/// First `` `quoted` `` token of a serde message.
fn backticked(detail: &str) -> Option<&str> {
    let (_, rest) = detail.split_once('`')?;
    rest.split_once('`').map(|(token, _)| token)
}

impl<T> aide::OperationInput for Query<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        AxumQuery::<T>::operation_input(ctx, operation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_token() {
        assert_eq!(backticked("missing field `limit`"), Some("limit"));
        assert_eq!(backticked("unknown variant `GONE`, expected one of"), Some("GONE"));
        assert_eq!(backticked("no quotes"), None);
    }

    #[test]
    fn missing_field_names_the_parameter() {
        let error = query_error("missing field `limit`");
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert!(error.message().unwrap_or_default().contains("'limit'"));
    }

    #[test]
    fn unknown_variant_names_the_value() {
        let error = query_error("unknown variant `GONE`, expected `ACTIVE` or `ARCHIVED`");
        assert!(error.message().unwrap_or_default().contains("'GONE'"));
    }
}
