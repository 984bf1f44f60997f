//! Path parameter types for HTTP handlers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Path parameters for institution-level operations.
#[must_use]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionPathParams {
    /// Unique identifier of the institution.
    pub institution_id: Uuid,
}

/// Path parameters for department operations.
#[must_use]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentPathParams {
    /// Unique identifier of the institution.
    pub institution_id: Uuid,
    /// Unique identifier of the department.
    pub department_id: Uuid,
}

/// Path parameters for role operations.
#[must_use]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RolePathParams {
    /// Unique identifier of the institution.
    pub institution_id: Uuid,
    /// Unique identifier of the role.
    pub role_id: Uuid,
}

/// Path parameters for institution user operations.
#[must_use]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionUserPathParams {
    /// Unique identifier of the institution.
    pub institution_id: Uuid,
    /// Unique identifier of the membership.
    pub institution_user_id: Uuid,
}
