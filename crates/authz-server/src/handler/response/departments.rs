//! Department response types.

use authz_postgres::model;
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a department of an institution.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    /// ID of the department.
    pub department_id: Uuid,
    /// ID of the owning institution.
    pub institution_id: Uuid,
    /// Name of the department.
    pub name: String,
    /// Timestamp when the department was created.
    pub created_at: Timestamp,
    /// Timestamp when the department was last updated.
    pub updated_at: Timestamp,
}

impl Department {
    pub fn from_model(department: model::Department) -> Self {
        Self {
            department_id: department.id,
            institution_id: department.institution_id,
            name: department.name,
            created_at: department.created_at.into(),
            updated_at: department.updated_at.into(),
        }
    }

    pub fn from_models(models: Vec<model::Department>) -> Vec<Self> {
        models.into_iter().map(Self::from_model).collect()
    }
}
