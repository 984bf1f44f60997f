//! Privilege catalog response types.

use authz_postgres::model;
use authz_postgres::types::PrivilegeKey;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Entry of the fixed privilege catalog.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Privilege {
    /// Key of the privilege as carried in tokens and role payloads.
    pub key: PrivilegeKey,
    /// Description of what the privilege allows.
    pub description: String,
}

impl Privilege {
    pub fn from_model(privilege: model::Privilege) -> Self {
        Self {
            key: privilege.key,
            description: privilege.description,
        }
    }

    pub fn from_models(models: Vec<model::Privilege>) -> Vec<Self> {
        models.into_iter().map(Self::from_model).collect()
    }
}
