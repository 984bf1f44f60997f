use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path as AxumPath};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use super::clip;
use crate::handler::{Error, ErrorKind};

/// [`axum::extract::Path`] that answers malformed identifiers with `400`
/// and a format hint.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Path<T>(pub T);

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AxumPath(value) = AxumPath::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

impl From<PathRejection> for Error<'static> {
    fn from(rejection: PathRejection) -> Self {
        let detail = clip(&rejection.body_text(), 2, 150);
        match rejection {
            PathRejection::FailedToDeserializePathParams(_) => ErrorKind::BadRequest
                .with_message(format_hint(&detail))
                .with_context(detail),
            PathRejection::MissingPathParams(_) => {
                ErrorKind::MissingPathParam.with_context(detail)
            }
            _ => ErrorKind::InternalServerError.with_context(detail),
        }
    }
}

/// Hint matching the parameter type that failed to parse.
fn format_hint(detail: &str) -> &'static str {
    let detail = detail.to_ascii_lowercase();
    if detail.contains("uuid") || detail.contains("invalid character") {
        "Identifiers are UUIDs such as 0195c1d2-7a3e-7b6f-9c1d-2e3f4a5b6c7d"
    } else if detail.contains("invalid digit") {
        "Numeric path segments contain digits only"
    } else {
        "A path segment has the wrong format"
    }
}

forward_operation_input!(Path => AxumPath);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_follow_the_failure() {
        assert!(format_hint("UUID parsing failed: invalid character").contains("UUIDs"));
        assert!(format_hint("invalid digit found in string").contains("digits"));
        assert_eq!(format_hint("anything"), "A path segment has the wrong format");
    }
}
