//! Filter options for institution user listings.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::InstitutionUserStatus;

/// Filter options for listing institution users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct InstitutionUserFilter {
    /// Only memberships with one of these statuses.
    #[serde(default)]
    pub statuses: Vec<InstitutionUserStatus>,
    /// Only memberships in this department.
    pub department_id: Option<Uuid>,
    /// Only memberships assigned this role.
    pub role_id: Option<Uuid>,
    /// Case-insensitive match on name, email or personal identification code.
    pub search: Option<String>,
}

impl InstitutionUserFilter {
    /// Returns the trimmed search term as a `LIKE` pattern, if any.
    pub fn search_pattern(&self) -> Option<String> {
        let term = self.search.as_deref()?.trim();
        if term.is_empty() {
            return None;
        }

        let escaped = term
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        Some(format!("%{escaped}%"))
    }

    /// Returns whether no filter is set.
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
            && self.department_id.is_none()
            && self.role_id.is_none()
            && self.search_pattern().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_pattern_escapes_wildcards() {
        let filter = InstitutionUserFilter {
            search: Some(" 50%_off ".into()),
            ..Default::default()
        };
        assert_eq!(filter.search_pattern().as_deref(), Some("%50\\%\\_off%"));
    }

    #[test]
    fn blank_search_is_ignored() {
        let filter = InstitutionUserFilter {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert!(filter.search_pattern().is_none());
        assert!(filter.is_empty());
    }
}
