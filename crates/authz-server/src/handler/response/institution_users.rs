//! Institution user response types.

use authz_postgres::model;
use authz_postgres::query::InstitutionUserWithRoles;
use authz_postgres::types::InstitutionUserStatus;
use jiff::civil::Date;
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Page, RoleSummary};

/// The person behind a membership.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// ID of the user.
    pub user_id: Uuid,
    /// Estonian personal identification code.
    pub personal_identification_code: String,
    /// Forename of the person.
    pub forename: String,
    /// Surname of the person.
    pub surname: String,
}

impl User {
    pub fn from_model(user: model::User) -> Self {
        Self {
            user_id: user.id,
            personal_identification_code: user.personal_identification_code,
            forename: user.forename,
            surname: user.surname,
        }
    }
}

/// Represents a membership of a user in an institution.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionUser {
    /// ID of the membership.
    pub institution_user_id: Uuid,
    /// ID of the institution.
    pub institution_id: Uuid,
    /// The person holding the membership.
    pub user: User,
    /// Department of the membership.
    pub department_id: Option<Uuid>,
    /// Work email address.
    pub email: String,
    /// Work phone number.
    pub phone: Option<String>,
    /// Status derived from the archive timestamp and deactivation date.
    pub status: InstitutionUserStatus,
    /// Deactivation date, possibly in the future.
    pub deactivation_date: Option<Date>,
    /// Timestamp when the membership was archived.
    pub archived_at: Option<Timestamp>,
    /// Roles assigned to the membership.
    pub roles: Vec<RoleSummary>,
    /// Timestamp when the membership was created.
    pub created_at: Timestamp,
    /// Timestamp when the membership was last updated.
    pub updated_at: Timestamp,
}

impl InstitutionUser {
    /// Creates a response from a membership and its user and roles.
    pub fn from_model(
        institution_user: model::InstitutionUser,
        user: model::User,
        roles: Vec<model::Role>,
    ) -> Self {
        let status = institution_user.status();
        let mut roles: Vec<RoleSummary> = roles.into_iter().map(RoleSummary::from_model).collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            institution_user_id: institution_user.id,
            institution_id: institution_user.institution_id,
            user: User::from_model(user),
            department_id: institution_user.department_id,
            email: institution_user.email,
            phone: institution_user.phone,
            status,
            deactivation_date: institution_user.deactivation_date.map(Date::from),
            archived_at: institution_user.archived_at.map(Timestamp::from),
            roles,
            created_at: institution_user.created_at.into(),
            updated_at: institution_user.updated_at.into(),
        }
    }

    pub fn from_joined(joined: InstitutionUserWithRoles) -> Self {
        Self::from_model(joined.institution_user, joined.user, joined.roles)
    }
}

/// Paginated response for institution users.
pub type InstitutionUsersPage = Page<InstitutionUser>;
