//! Department request types.

use authz_postgres::model::{NewDepartment, UpdateDepartment as UpdateDepartmentModel};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validations::validate_not_blank;

/// Request payload for creating a department.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartment {
    /// Name of the department, unique within the institution.
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub name: String,
}

impl CreateDepartment {
    #[inline]
    pub fn into_model(self, institution_id: Uuid) -> NewDepartment {
        NewDepartment::new(institution_id, self.name.trim())
    }
}

/// Request payload for renaming a department.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartment {
    /// New name of the department.
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
}

impl UpdateDepartment {
    pub fn into_model(self) -> UpdateDepartmentModel {
        UpdateDepartmentModel {
            name: self.name.map(|name| name.trim().to_owned()),
            ..Default::default()
        }
    }
}
