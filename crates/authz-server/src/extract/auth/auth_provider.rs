//! Tenant scope and privilege checks for authenticated callers.
//!
//! Every check is answered from the verified token alone. The selected
//! institution and privilege list in the `authz` claim are issued by the
//! identity provider at session creation and trusted for the token lifetime.

use authz_postgres::types::PrivilegeKey;
use uuid::Uuid;

use crate::handler::{ErrorKind, Result};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHORIZATION as TRACING_TARGET;

/// Authorization policies for an authenticated caller.
pub trait AuthProvider {
    /// Returns the personal identification code of the caller.
    fn personal_identification_code(&self) -> &str;

    /// Returns the membership the caller acts as, if any.
    fn institution_user_id(&self) -> Option<Uuid>;

    /// Returns the institution selected for the session, if any.
    fn selected_institution_id(&self) -> Option<Uuid>;

    /// Returns the privileges granted in the selected institution.
    fn privileges(&self) -> &[PrivilegeKey];

    /// Returns whether the caller holds the realm administrator role.
    fn is_admin(&self) -> bool;

    /// Returns whether the caller holds `privilege`.
    #[inline]
    fn has_privilege(&self, privilege: PrivilegeKey) -> bool {
        self.privileges().contains(&privilege)
    }

    /// Requires the selected institution to be `institution_id`.
    fn authorize_institution(&self, institution_id: Uuid) -> Result<()> {
        if self.selected_institution_id() == Some(institution_id) {
            return Ok(());
        }

        tracing::warn!(
            target: TRACING_TARGET,
            institution_id = %institution_id,
            selected_institution_id = ?self.selected_institution_id(),
            "Access denied: institution outside of session scope"
        );

        Err(ErrorKind::Forbidden
            .with_message("Access to this institution is not allowed")
            .with_context("The institution is not selected for the current session")
            .with_resource("institution"))
    }

    /// Requires tenant scope and `privilege`.
    fn authorize_privilege(&self, institution_id: Uuid, privilege: PrivilegeKey) -> Result<()> {
        self.authorize_institution(institution_id)?;

        if self.has_privilege(privilege) {
            tracing::debug!(
                target: TRACING_TARGET,
                institution_id = %institution_id,
                privilege = %privilege,
                "Access granted: privilege held"
            );
            return Ok(());
        }

        tracing::warn!(
            target: TRACING_TARGET,
            institution_id = %institution_id,
            privilege = %privilege,
            "Access denied: missing privilege"
        );

        Err(ErrorKind::Forbidden
            .with_message("Insufficient privileges")
            .with_context(format!("Privilege {privilege} is required")))
    }

    /// Requires tenant scope, and either that the caller is
    /// `institution_user_id` or holds `privilege`.
    fn authorize_self_or_privilege(
        &self,
        institution_id: Uuid,
        institution_user_id: Uuid,
        privilege: PrivilegeKey,
    ) -> Result<()> {
        self.authorize_institution(institution_id)?;

        if self.institution_user_id() == Some(institution_user_id) {
            tracing::debug!(
                target: TRACING_TARGET,
                institution_user_id = %institution_user_id,
                "Access granted: own membership"
            );
            return Ok(());
        }

        self.authorize_privilege(institution_id, privilege)
    }

    /// Requires the realm administrator role.
    fn authorize_admin(&self) -> Result<()> {
        if self.is_admin() {
            return Ok(());
        }

        tracing::warn!(target: TRACING_TARGET, "Access denied: administrator role required");

        Err(ErrorKind::Forbidden
            .with_message("Administrator privileges required")
            .with_context("Only realm administrators can perform this operation"))
    }
}
