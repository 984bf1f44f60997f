//! JSON extractor with `validator` checks.

use std::borrow::Cow;
use std::collections::HashMap;

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use super::Json;
use crate::handler::response::ValidationErrorDetail;
use crate::handler::{Error, ErrorKind};

/// JSON extractor that runs [`Validate`] after deserialization.
///
/// Failures are rejected with `400` and one [`ValidationErrorDetail`] per
/// failed rule. Nested structs and lists are reported with their full path,
/// such as `vacations[2].endDate`.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Converts a Rust field name to the camelCase name used on the wire.
fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            name.extend(c.to_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}

fn join_path(prefix: &str, field: &str) -> String {
    let field = if field == "__all__" {
        String::new()
    } else {
        wire_name(field)
    };

    match (prefix.is_empty(), field.is_empty()) {
        (true, _) => field,
        (false, true) => prefix.to_owned(),
        (false, false) => format!("{prefix}.{field}"),
    }
}

fn number_param(params: &HashMap<Cow<'static, str>, serde_json::Value>, key: &str) -> Option<u64> {
    params.get(key).and_then(serde_json::Value::as_u64)
}

fn bounds(error: &ValidationError) -> (Option<u64>, Option<u64>) {
    (number_param(&error.params, "min"), number_param(&error.params, "max"))
}

/// Sentence describing one failed rule.
fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let rule = match (error.code.as_ref(), bounds(error)) {
        ("required", _) => "is required".to_owned(),
        ("email", _) => "is not an email address".to_owned(),
        ("regex", _) => "has the wrong format".to_owned(),
        ("length", (Some(min), Some(max))) => format!("must have {min} to {max} characters"),
        ("length", (Some(min), None)) => format!("must have at least {min} characters"),
        ("length", (None, Some(max))) => format!("must have at most {max} characters"),
        ("range", (Some(min), Some(max))) => format!("must be from {min} to {max}"),
        ("range", (Some(min), None)) => format!("must be at least {min}"),
        ("range", (None, Some(max))) => format!("must be at most {max}"),
        (code, _) => format!("failed the '{code}' check"),
    };
    format!("'{field}' {rule}")
}

/// Walks nested validation errors and produces one detail per failure.
fn collect_details(errors: &ValidationErrors, prefix: &str, out: &mut Vec<ValidationErrorDetail>) {
    for (field, kind) in errors.errors() {
        let path = join_path(prefix, field);
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let params: HashMap<String, serde_json::Value> = error
                        .params
                        .iter()
                        .filter(|(key, _)| key.as_ref() != "value")
                        .map(|(key, value)| (key.to_string(), value.clone()))
                        .collect();

                    out.push(ValidationErrorDetail {
                        message: describe(&path, error),
                        field: path.clone(),
                        code: error.code.to_string(),
                        params: (!params.is_empty()).then_some(params),
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_details(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_details(nested, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let mut details = Vec::new();
        collect_details(&errors, "", &mut details);
        details.sort_by(|a, b| a.field.cmp(&b.field));

        let summary = details
            .iter()
            .map(|detail| detail.message.as_str())
            .collect::<Vec<_>>()
            .join(". ");

        tracing::debug!(
            target: "authz_server::extract::validation",
            failures = details.len(),
            "request body failed validation"
        );

        ErrorKind::Validation
            .with_message(summary)
            .with_resource("request")
            .with_validation(details)
    }
}

forward_operation_input!(ValidateJson => Json);

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use validator::Validate;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Item {
        #[validate(length(min = 1, max = 10))]
        display_name: String,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(email)]
        email: String,
        #[validate(nested)]
        items: Vec<Item>,
    }

    #[test]
    fn messages_use_rule_bounds() {
        let mut error = ValidationError::new("length");
        error.add_param(Cow::Borrowed("min"), &1);
        error.add_param(Cow::Borrowed("max"), &10);
        assert_eq!(describe("name", &error), "'name' must have 1 to 10 characters");

        let error = ValidationError::new("date_order");
        assert_eq!(describe("endDate", &error), "'endDate' failed the 'date_order' check");
    }

    #[test]
    fn wire_names_are_camel_case() {
        assert_eq!(wire_name("start_date"), "startDate");
        assert_eq!(wire_name("name"), "name");
    }

    #[test]
    fn nested_errors_carry_their_path() {
        let payload = Payload {
            email: "not-an-email".to_owned(),
            items: vec![
                Item {
                    display_name: "ok".to_owned(),
                },
                Item {
                    display_name: String::new(),
                },
            ],
        };

        let error: Error = payload.validate().unwrap_err().into();
        assert_eq!(error.kind(), ErrorKind::Validation);

        let fields: Vec<&str> = error
            .validation()
            .unwrap_or_default()
            .iter()
            .map(|detail| detail.field.as_str())
            .collect();
        assert_eq!(fields, vec!["email", "items[1].displayName"]);
    }
}
