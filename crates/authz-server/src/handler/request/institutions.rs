//! Institution request types.

use authz_postgres::model::{NewInstitution, UpdateInstitution as UpdateInstitutionModel};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validations::{normalize_optional, validate_not_blank};

/// Request payload for creating a new institution.
///
/// The institution is created together with its root role, which holds every
/// privilege.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstitution {
    /// Name of the institution (1-300 characters).
    #[validate(length(min = 1, max = 300), custom(function = "validate_not_blank"))]
    pub name: String,
    /// Abbreviation shown in compact views (at most 3 characters).
    #[validate(length(max = 3))]
    pub short_name: Option<String>,
    /// Contact email address.
    #[validate(email, length(max = 320))]
    pub email: Option<String>,
    /// Contact phone number.
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    /// URL of the institution logo.
    #[validate(url)]
    pub logo_url: Option<String>,
}

impl CreateInstitution {
    /// Converts this request into a [`NewInstitution`] model.
    pub fn into_model(self) -> NewInstitution {
        NewInstitution {
            name: self.name.trim().to_owned(),
            short_name: normalize_optional(self.short_name),
            email: normalize_optional(self.email),
            phone: normalize_optional(self.phone),
            logo_url: normalize_optional(self.logo_url),
        }
    }
}

/// Request payload for updating an institution.
///
/// All fields are optional; only provided fields are updated.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInstitution {
    /// New name of the institution (1-300 characters).
    #[validate(length(min = 1, max = 300), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    /// New abbreviation (at most 3 characters).
    #[validate(length(max = 3))]
    pub short_name: Option<String>,
    /// New contact email address.
    #[validate(email, length(max = 320))]
    pub email: Option<String>,
    /// New contact phone number.
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    /// New logo URL.
    #[validate(url)]
    pub logo_url: Option<String>,
}

impl UpdateInstitution {
    pub fn into_model(self) -> UpdateInstitutionModel {
        UpdateInstitutionModel {
            name: self.name.map(|name| name.trim().to_owned()),
            short_name: self.short_name.map(|value| normalize_optional(Some(value))),
            email: self.email.map(|value| normalize_optional(Some(value))),
            phone: self.phone.map(|value| normalize_optional(Some(value))),
            logo_url: self.logo_url.map(|value| normalize_optional(Some(value))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_a_name() {
        let request = CreateInstitution {
            name: "   ".to_owned(),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn short_name_is_limited() {
        let request = CreateInstitution {
            name: "Tõlkebüroo".to_owned(),
            short_name: Some("TLKB".to_owned()),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn blank_optional_fields_clear_columns() {
        let model = UpdateInstitution {
            phone: Some(" ".to_owned()),
            ..Default::default()
        }
        .into_model();

        assert_eq!(model.phone, Some(None));
        assert_eq!(model.email, None);
    }
}
