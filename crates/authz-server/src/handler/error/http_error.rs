//! The handler [`Error`] and its [`ErrorKind`] catalog.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::handler::response::{ErrorResponse, ValidationErrorDetail};
use crate::utility::tracing_targets::TRACING_TARGET_HANDLER_ERROR;

/// Failure of a request handler or extractor.
///
/// The [`ErrorKind`] decides the status and the base body. Everything else is
/// optional detail: `message` and `resource` reach the client, `context`
/// only reaches the log.
#[derive(Clone)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error<'a> {
    kind: ErrorKind,
    message: Option<Cow<'a, str>>,
    resource: Option<Cow<'a, str>>,
    context: Option<Cow<'a, str>>,
    validation: Option<Vec<ValidationErrorDetail>>,
}

impl Error<'static> {
    /// Creates an error of `kind` without details.
    #[inline]
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            resource: None,
            context: None,
            validation: None,
        }
    }
}

impl<'a> Error<'a> {
    /// Sets a message that extends the kind's summary.
    #[inline]
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Names the kind of record the failure concerns.
    #[inline]
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Attaches detail for the log.
    #[inline]
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attaches per-field or per-row problems.
    #[inline]
    pub fn with_validation(mut self, details: Vec<ValidationErrorDetail>) -> Self {
        self.validation = Some(details);
        self
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[inline]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    #[inline]
    pub fn validation(&self) -> Option<&[ValidationErrorDetail]> {
        self.validation.as_deref()
    }

    /// Detaches the error from borrowed data.
    pub fn into_static(self) -> Error<'static> {
        Error {
            kind: self.kind,
            message: self.message.map(|m| Cow::Owned(m.into_owned())),
            resource: self.resource.map(|r| Cow::Owned(r.into_owned())),
            context: self.context.map(|c| Cow::Owned(c.into_owned())),
            validation: self.validation,
        }
    }
}

impl Default for Error<'static> {
    #[inline]
    fn default() -> Self {
        Self::new(ErrorKind::default())
    }
}

impl fmt::Debug for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("status", &self.kind.status())
            .field("message", &self.message)
            .field("resource", &self.resource)
            .field("context", &self.context)
            .field("validation", &self.validation.as_ref().map(Vec::len))
            .finish()
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind.name(), self.kind.status().as_u16())?;

        if let Some(resource) = &self.resource {
            write!(f, " on {resource}")?;
        }

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(context) = &self.context {
            write!(f, " [{context}]")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl aide::OperationOutput for Error<'_> {
    type Inner = ();
}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        let status = self.kind.status();
        if status.is_server_error() {
            tracing::error!(
                target: TRACING_TARGET_HANDLER_ERROR,
                kind = self.kind.name(),
                status = status.as_u16(),
                resource = self.resource.as_deref(),
                context = self.context.as_deref(),
                "request failed"
            );
        } else {
            tracing::debug!(
                target: TRACING_TARGET_HANDLER_ERROR,
                kind = self.kind.name(),
                status = status.as_u16(),
                resource = self.resource.as_deref(),
                context = self.context.as_deref(),
                "request rejected"
            );
        }

        let mut body = ErrorResponse::from_kind(self.kind);
        if let Some(message) = self.message {
            body = body.with_message(message);
        }
        if let Some(resource) = self.resource {
            body = body.with_resource(resource);
        }
        if let Some(validation) = self.validation {
            body = body.with_validation(validation);
        }

        body.into_response()
    }
}

impl From<ErrorKind> for Error<'static> {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// A specialized [`Result`] type for HTTP handlers.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Every failure the API reports.
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// `400`: a required path segment is missing or malformed.
    MissingPathParam,
    /// `400`: the request cannot be processed as sent.
    BadRequest,
    /// `400`: one or more fields or CSV rows failed validation.
    Validation,
    /// `401`: no bearer token.
    MissingAuthToken,
    /// `401`: the bearer token cannot be decoded or verified.
    MalformedAuthToken,
    /// `401`: the bearer token has expired.
    TokenExpired,
    /// `401`: the token lacks the claims this API needs.
    Unauthorized,
    /// `403`: another institution, or a missing privilege.
    Forbidden,
    /// `404`
    NotFound,
    /// `409`: uniqueness, the root role guard or a lifecycle transition.
    Conflict,
    /// `413`
    PayloadTooLarge,
    /// `500`
    #[default]
    InternalServerError,
    /// `503`: the database is unreachable.
    ServiceUnavailable,
    /// `504`: the request exceeded the configured timeout.
    GatewayTimeout,
}

impl ErrorKind {
    #[inline]
    pub const fn into_error(self) -> Error<'static> {
        Error::new(self)
    }

    #[inline]
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_message(message)
    }

    #[inline]
    pub fn with_resource<'a>(self, resource: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_resource(resource)
    }

    #[inline]
    pub fn with_context<'a>(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_context(context)
    }

    /// Returns the HTTP status of this kind.
    pub const fn status(self) -> StatusCode {
        match self {
            Self::MissingPathParam | Self::BadRequest | Self::Validation => StatusCode::BAD_REQUEST,
            Self::MissingAuthToken
            | Self::MalformedAuthToken
            | Self::TokenExpired
            | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Returns the `name` field of the response body.
    pub const fn name(self) -> &'static str {
        match self {
            Self::MissingPathParam => "missing_path_param",
            Self::BadRequest => "bad_request",
            Self::Validation => "validation_error",
            Self::MissingAuthToken => "missing_auth_token",
            Self::MalformedAuthToken => "malformed_auth_token",
            Self::TokenExpired => "token_expired",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::PayloadTooLarge => "payload_too_large",
            Self::InternalServerError => "internal_server_error",
            Self::ServiceUnavailable => "service_unavailable",
            Self::GatewayTimeout => "gateway_timeout",
        }
    }

    pub(crate) const fn summary(self) -> &'static str {
        match self {
            Self::MissingPathParam => "The request path is incomplete.",
            Self::BadRequest => "The request could not be processed.",
            Self::Validation => "The request contains invalid values.",
            Self::MissingAuthToken => "A bearer token is required.",
            Self::MalformedAuthToken => "The bearer token is not valid.",
            Self::TokenExpired => "The bearer token has expired.",
            Self::Unauthorized => "The caller could not be identified.",
            Self::Forbidden => "The caller may not perform this action.",
            Self::NotFound => "The requested record does not exist.",
            Self::Conflict => "The request conflicts with the current state.",
            Self::PayloadTooLarge => "The request body is too large.",
            Self::InternalServerError => "Something went wrong on our side.",
            Self::ServiceUnavailable => "The service is temporarily unavailable.",
            Self::GatewayTimeout => "The request took too long.",
        }
    }

    pub(crate) const fn suggestion(self) -> Option<&'static str> {
        match self {
            Self::MissingAuthToken | Self::TokenExpired => {
                Some("Sign in again and send the token in the Authorization header.")
            }
            Self::Unauthorized => Some("Select an institution before calling this endpoint."),
            Self::Forbidden => {
                Some("Ask an administrator of the institution for the required privilege.")
            }
            Self::ServiceUnavailable | Self::GatewayTimeout => Some("Retry in a moment."),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        Error::new(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_internal_error() {
        let error = Error::default();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn builder_keeps_every_detail() {
        let error = ErrorKind::NotFound
            .with_message("Role not found")
            .with_resource("role")
            .with_context("role_id=5f0e");

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), Some("Role not found"));
        assert_eq!(error.resource(), Some("role"));
        assert_eq!(error.context(), Some("role_id=5f0e"));
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let error = ErrorKind::Validation.into_error().with_validation(vec![
            ValidationErrorDetail::new("vacations[2]", "duplicate_range", "Repeated range"),
        ]);

        assert_eq!(error.validation().map(<[_]>::len), Some(1));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn display_names_kind_and_resource() {
        let error = ErrorKind::Conflict
            .with_resource("department")
            .with_message("Name already in use")
            .with_context("name=Tõlge");

        assert_eq!(
            error.to_string(),
            "conflict (409) on department: Name already in use [name=Tõlge]"
        );
    }

    #[test]
    fn owned_copy_survives_borrow() {
        let name = String::from("institution_user");
        let error = ErrorKind::NotFound.with_resource(name.as_str()).into_static();
        drop(name);
        assert_eq!(error.resource(), Some("institution_user"));
    }

    #[test]
    fn every_kind_is_an_error_status() {
        let kinds = [
            ErrorKind::MissingPathParam,
            ErrorKind::BadRequest,
            ErrorKind::Validation,
            ErrorKind::MissingAuthToken,
            ErrorKind::MalformedAuthToken,
            ErrorKind::TokenExpired,
            ErrorKind::Unauthorized,
            ErrorKind::Forbidden,
            ErrorKind::NotFound,
            ErrorKind::Conflict,
            ErrorKind::PayloadTooLarge,
            ErrorKind::InternalServerError,
            ErrorKind::ServiceUnavailable,
            ErrorKind::GatewayTimeout,
        ];

        for kind in kinds {
            assert!(kind.status().as_u16() >= 400, "{kind}");
            assert!(kind.summary().ends_with('.'));
        }
    }
}
