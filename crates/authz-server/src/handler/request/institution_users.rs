//! Institution user request types.
//!
//! Covers membership creation, edits, the lifecycle transitions
//! (deactivate, activate) and the listing filters.

use authz_postgres::model::{
    NewInstitutionUser, NewUser, UpdateInstitutionUser as UpdateModel, UpdateUser,
};
use authz_postgres::types::{InstitutionUserFilter, InstitutionUserStatus};
use jiff::civil::Date;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Pagination;
use super::validations::{
    normalize_optional, validate_not_blank, validate_personal_identification_code,
    validate_phone_number,
};

/// Request payload for adding a person to an institution.
///
/// The person is looked up by personal identification code and created when
/// unknown.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstitutionUser {
    /// Estonian personal identification code.
    #[validate(custom(function = "validate_personal_identification_code"))]
    pub personal_identification_code: String,
    /// Forename of the person.
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub forename: String,
    /// Surname of the person.
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub surname: String,
    /// Work email address within the institution.
    #[validate(email, length(min = 3, max = 320))]
    pub email: String,
    /// Work phone number.
    #[validate(length(max = 50), custom(function = "validate_phone_number"))]
    pub phone: Option<String>,
    /// Department of the membership.
    pub department_id: Option<Uuid>,
    /// Roles assigned to the membership.
    #[serde(default)]
    pub role_ids: Vec<Uuid>,
}

impl CreateInstitutionUser {
    /// Returns the user row to create when the person is unknown.
    pub fn to_new_user(&self) -> NewUser {
        NewUser {
            personal_identification_code: self.personal_identification_code.clone(),
            forename: self.forename.trim().to_owned(),
            surname: self.surname.trim().to_owned(),
        }
    }

    /// Returns the membership row for `user_id`.
    pub fn to_new_institution_user(&self, institution_id: Uuid, user_id: Uuid) -> NewInstitutionUser {
        NewInstitutionUser {
            institution_id,
            user_id,
            department_id: self.department_id,
            email: self.email.trim().to_owned(),
            phone: normalize_optional(self.phone.clone()),
        }
    }
}

/// Request payload for editing a membership.
///
/// All fields are optional. `roleIds`, when present, replaces the assigned
/// roles.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInstitutionUser {
    /// New forename of the person.
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub forename: Option<String>,
    /// New surname of the person.
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub surname: Option<String>,
    /// New work email address.
    #[validate(email, length(min = 3, max = 320))]
    pub email: Option<String>,
    /// New work phone number; blank clears it.
    #[validate(length(max = 50), custom(function = "validate_phone_number"))]
    pub phone: Option<String>,
    /// New department; `null` removes the member from its department.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<Uuid>")]
    pub department_id: Option<Option<Uuid>>,
    /// New role assignment.
    pub role_ids: Option<Vec<Uuid>>,
}

/// Keeps an explicit `null` apart from an absent field.
fn deserialize_nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateInstitutionUser {
    /// Returns the membership changeset.
    pub fn to_model(&self) -> UpdateModel {
        UpdateModel {
            department_id: self.department_id,
            email: self.email.as_ref().map(|email| email.trim().to_owned()),
            phone: self
                .phone
                .as_ref()
                .map(|phone| normalize_optional(Some(phone.clone()))),
            ..Default::default()
        }
    }

    /// Returns the user changeset for names.
    pub fn to_user_model(&self) -> UpdateUser {
        UpdateUser {
            forename: self.forename.as_ref().map(|name| name.trim().to_owned()),
            surname: self.surname.as_ref().map(|name| name.trim().to_owned()),
        }
    }
}

/// Request payload for deactivating a membership.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeactivateInstitutionUser {
    /// Day from which the membership is deactivated, in Europe/Tallinn.
    ///
    /// Must be today or later.
    pub deactivation_date: Date,
}

/// Request payload for activating a deactivated membership.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActivateInstitutionUser {
    /// Roles assigned on activation; at least one is required.
    #[validate(length(min = 1))]
    pub role_ids: Vec<Uuid>,
}

/// Query parameters for listing memberships.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListInstitutionUsers {
    /// Statuses to include; repeat the key for several.
    #[serde(default)]
    pub status: Vec<InstitutionUserStatus>,
    /// Only members of this department.
    pub department_id: Option<Uuid>,
    /// Only holders of this role.
    pub role_id: Option<Uuid>,
    /// Case-insensitive match on names, email or personal identification code.
    #[validate(length(max = 255))]
    pub search: Option<String>,
    /// The number of records to skip.
    #[validate(range(min = 0, max = 100000))]
    pub offset: Option<u32>,
    /// The maximum number of records to return.
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u32>,
}

impl ListInstitutionUsers {
    /// Splits the query into the repository filter and pagination.
    pub fn into_parts(self) -> (InstitutionUserFilter, Pagination) {
        let filter = InstitutionUserFilter {
            statuses: self.status,
            department_id: self.department_id,
            role_id: self.role_id,
            search: self.search,
        };

        let pagination = Pagination {
            offset: self.offset,
            limit: self.limit,
        };

        (filter, pagination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateInstitutionUser {
        CreateInstitutionUser {
            personal_identification_code: "37605030299".to_owned(),
            forename: "Mari".to_owned(),
            surname: "Maasikas".to_owned(),
            email: "mari@example.ee".to_owned(),
            phone: Some("  ".to_owned()),
            department_id: None,
            role_ids: vec![Uuid::new_v4()],
        }
    }

    #[test]
    fn create_validates_personal_identification_code() {
        assert!(create_request().validate().is_ok());

        let request = CreateInstitutionUser {
            personal_identification_code: "37605030291".to_owned(),
            ..create_request()
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("personal_identification_code"));
    }

    #[test]
    fn create_drops_blank_phone() {
        let request = create_request();
        let member = request.to_new_institution_user(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(member.phone, None);
        assert_eq!(request.to_new_user().forename, "Mari");
    }

    #[test]
    fn null_department_clears_it() -> anyhow::Result<()> {
        let absent: UpdateInstitutionUser = serde_json::from_str(r#"{"email":"a@b.ee"}"#)?;
        assert_eq!(absent.department_id, None);
        assert_eq!(absent.to_model().department_id, None);

        let cleared: UpdateInstitutionUser = serde_json::from_str(r#"{"departmentId":null}"#)?;
        assert_eq!(cleared.department_id, Some(None));
        assert_eq!(cleared.to_model().department_id, Some(None));

        let id = Uuid::new_v4();
        let moved: UpdateInstitutionUser =
            serde_json::from_value(serde_json::json!({ "departmentId": id }))?;
        assert_eq!(moved.to_model().department_id, Some(Some(id)));
        Ok(())
    }

    #[test]
    fn activation_requires_roles() {
        assert!(ActivateInstitutionUser::default().validate().is_err());
    }

    #[test]
    fn list_query_splits_into_filter() {
        let query = ListInstitutionUsers {
            status: vec![InstitutionUserStatus::Active],
            search: Some("mari".to_owned()),
            limit: Some(20),
            ..Default::default()
        };

        let (filter, pagination) = query.into_parts();
        assert_eq!(filter.statuses, vec![InstitutionUserStatus::Active]);
        assert_eq!(pagination.limit(), 20);
    }
}
