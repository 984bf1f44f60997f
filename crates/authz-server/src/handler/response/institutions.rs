//! Institution response types.

use authz_postgres::model;
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents an institution.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    /// ID of the institution.
    pub institution_id: Uuid,
    /// Name of the institution.
    pub name: String,
    /// Abbreviation of the institution.
    pub short_name: Option<String>,
    /// Contact email address.
    pub email: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// URL of the institution logo.
    pub logo_url: Option<String>,
    /// Timestamp when the institution was created.
    pub created_at: Timestamp,
    /// Timestamp when the institution was last updated.
    pub updated_at: Timestamp,
}

impl Institution {
    pub fn from_model(institution: model::Institution) -> Self {
        Self {
            institution_id: institution.id,
            name: institution.name,
            short_name: institution.short_name,
            email: institution.email,
            phone: institution.phone,
            logo_url: institution.logo_url,
            created_at: institution.created_at.into(),
            updated_at: institution.updated_at.into(),
        }
    }

    pub fn from_models(models: Vec<model::Institution>) -> Vec<Self> {
        models.into_iter().map(Self::from_model).collect()
    }
}
