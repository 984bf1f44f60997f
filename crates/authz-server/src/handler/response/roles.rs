//! Role response types.

use authz_postgres::model;
use authz_postgres::query::RoleWithPrivileges;
use authz_postgres::types::PrivilegeKey;
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a role with its granted privileges.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// ID of the role.
    pub role_id: Uuid,
    /// ID of the owning institution.
    pub institution_id: Uuid,
    /// Name of the role.
    pub name: String,
    /// Whether this is the institution's immutable root role.
    pub is_root: bool,
    /// Privileges granted by the role.
    pub privileges: Vec<PrivilegeKey>,
    /// Timestamp when the role was created.
    pub created_at: Timestamp,
    /// Timestamp when the role was last updated.
    pub updated_at: Timestamp,
}

impl Role {
    pub fn from_model(role: model::Role, mut privileges: Vec<PrivilegeKey>) -> Self {
        privileges.sort();
        Self {
            role_id: role.id,
            institution_id: role.institution_id,
            name: role.name,
            is_root: role.is_root,
            privileges,
            created_at: role.created_at.into(),
            updated_at: role.updated_at.into(),
        }
    }

    pub fn from_models(models: Vec<RoleWithPrivileges>) -> Vec<Self> {
        models
            .into_iter()
            .map(|item| Self::from_model(item.role, item.privileges))
            .collect()
    }
}

/// Reference to a role embedded in membership responses.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleSummary {
    /// ID of the role.
    pub role_id: Uuid,
    /// Name of the role.
    pub name: String,
    /// Whether this is the root role.
    pub is_root: bool,
}

impl RoleSummary {
    pub fn from_model(role: model::Role) -> Self {
        Self {
            role_id: role.id,
            name: role.name,
            is_root: role.is_root,
        }
    }
}
