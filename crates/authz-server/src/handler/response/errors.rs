use std::borrow::Cow;
use std::collections::HashMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use schemars::JsonSchema;
use serde::Serialize;

use crate::handler::ErrorKind;

/// A problem with one field of a request body or one cell of a CSV row.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ValidationErrorDetail {
    /// Path of the offending value, e.g. `vacations[1].endDate` or
    /// `rows[4].email`.
    pub field: String,
    /// Machine-readable code such as `invalid_range` or `unknown_role`.
    pub code: String,
    /// Message for people.
    pub message: String,
    /// Values the check compared against, when the validator reports them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, serde_json::Value>>,
}

impl ValidationErrorDetail {
    /// Creates a detail without parameters.
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
            params: None,
        }
    }
}

/// JSON body of every `4xx` and `5xx` response.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse<'a> {
    /// Stable identifier of the failure, e.g. `token_expired`.
    pub name: Cow<'a, str>,
    /// Message that is safe to show to the caller.
    pub message: Cow<'a, str>,
    /// Kind of record the failure concerns, e.g. `institution_user`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Cow<'a, str>>,
    /// What the caller can do about it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Cow<'a, str>>,
    /// Per-field or per-row problems.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<Vec<ValidationErrorDetail>>,

    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    /// Returns the base body of `kind`.
    pub const fn from_kind(kind: ErrorKind) -> Self {
        Self {
            name: Cow::Borrowed(kind.name()),
            message: Cow::Borrowed(kind.summary()),
            resource: None,
            suggestion: match kind.suggestion() {
                Some(suggestion) => Some(Cow::Borrowed(suggestion)),
                None => None,
            },
            validation: None,
            status: kind.status(),
        }
    }

    /// Appends a sentence to the base message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        let summary = self.message.trim_end_matches('.');
        self.message = Cow::Owned(format!("{summary}. {}", message.into()));
        self
    }

    /// Sets the resource, nesting it under one that is already set.
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        let resource = resource.into();
        self.resource = Some(match self.resource.take() {
            Some(parent) => Cow::Owned(format!("{parent}/{resource}")),
            None => resource,
        });
        self
    }

    /// Replaces the suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<Cow<'a, str>>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attaches per-field or per-row problems.
    pub fn with_validation(mut self, details: Vec<ValidationErrorDetail>) -> Self {
        self.validation = Some(details);
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::from_kind(ErrorKind::default())
    }
}

impl IntoResponse for ErrorResponse<'_> {
    #[inline]
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_resources_are_joined() {
        let response = ErrorResponse::from_kind(ErrorKind::NotFound)
            .with_resource("institution")
            .with_resource("role");

        assert_eq!(response.resource.as_deref(), Some("institution/role"));
    }

    #[test]
    fn messages_extend_the_summary() {
        let response = ErrorResponse::from_kind(ErrorKind::Conflict)
            .with_message("The root role cannot be deleted");

        assert_eq!(
            response.message,
            "The request conflicts with the current state. The root role cannot be deleted"
        );
    }

    #[test]
    fn status_is_not_serialized() -> anyhow::Result<()> {
        let response = ErrorResponse::from_kind(ErrorKind::TokenExpired).with_resource("token");
        let json = serde_json::to_value(&response)?;

        assert_eq!(json["name"], "token_expired");
        assert_eq!(json["resource"], "token");
        assert!(json["suggestion"].is_string());
        assert!(json.get("status").is_none());
        Ok(())
    }

    #[test]
    fn validation_details_are_serialized() -> anyhow::Result<()> {
        let response = ErrorResponse::from_kind(ErrorKind::Validation).with_validation(vec![
            ValidationErrorDetail::new("rows[0].email", "email", "Invalid email"),
        ]);

        let json = serde_json::to_value(&response)?;
        assert_eq!(json["validation"][0]["field"], "rows[0].email");
        assert_eq!(json["validation"][0]["code"], "email");
        assert!(json["validation"][0].get("params").is_none());
        Ok(())
    }
}
