//! Role request types.

use authz_postgres::model::{NewRole, ROOT_ROLE_NAME, UpdateRole as UpdateRoleModel};
use authz_postgres::types::PrivilegeKey;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::validations::{validate_not_blank, validation_error};

/// Rejects names that collide with the root role.
fn validate_role_name(name: &str) -> Result<(), ValidationError> {
    validate_not_blank(name)?;
    if name.trim().eq_ignore_ascii_case(ROOT_ROLE_NAME) {
        return Err(validation_error(
            "reserved_role_name",
            "This role name is reserved",
        ));
    }
    Ok(())
}

/// Request payload for creating a role.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRole {
    /// Name of the role, unique within the institution.
    #[validate(length(min = 1, max = 255), custom(function = "validate_role_name"))]
    pub name: String,
    /// Privileges granted by the role.
    #[serde(default)]
    pub privileges: Vec<PrivilegeKey>,
}

impl CreateRole {
    #[inline]
    pub fn into_model(&self, institution_id: Uuid) -> NewRole {
        NewRole::new(institution_id, self.name.trim())
    }
}

/// Request payload for updating a role.
///
/// `privileges`, when present, replaces the whole privilege set.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRole {
    /// New name of the role.
    #[validate(length(min = 1, max = 255), custom(function = "validate_role_name"))]
    pub name: Option<String>,
    /// New privilege set.
    pub privileges: Option<Vec<PrivilegeKey>>,
}

impl UpdateRole {
    /// Returns whether the request changes anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.privileges.is_none()
    }

    pub fn to_model(&self) -> UpdateRoleModel {
        UpdateRoleModel {
            name: self.name.as_ref().map(|name| name.trim().to_owned()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_name_is_reserved() {
        let request = CreateRole {
            name: "root".to_owned(),
            privileges: vec![],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn privileges_deserialize_from_keys() -> anyhow::Result<()> {
        let request: CreateRole =
            serde_json::from_str(r#"{"name":"Projektijuht","privileges":["VIEW_USER","ADD_ROLE"]}"#)?;
        assert!(request.validate().is_ok());
        assert_eq!(
            request.privileges,
            vec![PrivilegeKey::ViewUser, PrivilegeKey::AddRole]
        );
        Ok(())
    }
}
