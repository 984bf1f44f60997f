//! Authentication and authorization.
//!
//! - [`AuthHeader`] verifies the bearer token.
//! - [`AuthClaims`] holds the verified claims.
//! - [`AuthState`] is the extractor used by private handlers.
//! - [`AuthProvider`] carries the tenant scope and privilege policies.

mod auth_provider;
mod auth_state;
mod jwt_claims;
mod jwt_header;

use authz_postgres::types::PrivilegeKey;
use uuid::Uuid;

pub use self::auth_provider::AuthProvider;
pub use self::auth_state::AuthState;
pub use self::jwt_claims::{
    ADMIN_REALM_ROLE, AuthClaims, AuthzClaim, RealmAccess, SelectedInstitution,
};
pub use self::jwt_header::AuthHeader;

impl AuthProvider for AuthClaims {
    fn personal_identification_code(&self) -> &str {
        &self.authz.personal_identification_code
    }

    fn institution_user_id(&self) -> Option<Uuid> {
        self.authz.institution_user_id
    }

    fn selected_institution_id(&self) -> Option<Uuid> {
        self.authz.selected_institution.as_ref().map(|i| i.id)
    }

    fn privileges(&self) -> &[PrivilegeKey] {
        &self.authz.privileges
    }

    fn is_admin(&self) -> bool {
        self.has_admin_role()
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use super::*;
    use crate::handler::ErrorKind;

    fn claims(institution_id: Uuid, privileges: Vec<PrivilegeKey>) -> AuthClaims {
        let authz = AuthzClaim {
            personal_identification_code: "49403136526".to_owned(),
            user_id: Some(Uuid::new_v4()),
            institution_user_id: Some(Uuid::new_v4()),
            selected_institution: Some(SelectedInstitution {
                id: institution_id,
                name: "Keelekeskus".to_owned(),
            }),
            privileges,
        };
        AuthClaims::new("kc-user", authz, SignedDuration::from_mins(5))
    }

    #[test]
    fn tenant_mismatch_is_forbidden() {
        let claims = claims(Uuid::new_v4(), PrivilegeKey::all());
        let error = claims.authorize_institution(Uuid::new_v4()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn privilege_is_required_within_tenant() {
        let institution_id = Uuid::new_v4();
        let claims = claims(institution_id, vec![PrivilegeKey::ViewRole]);

        assert!(claims.authorize_privilege(institution_id, PrivilegeKey::ViewRole).is_ok());
        let error = claims
            .authorize_privilege(institution_id, PrivilegeKey::AddRole)
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn own_membership_needs_no_privilege() {
        let institution_id = Uuid::new_v4();
        let claims = claims(institution_id, Vec::new());
        let own_id = claims.authz.institution_user_id.expect("membership is set");

        assert!(
            claims
                .authorize_self_or_privilege(institution_id, own_id, PrivilegeKey::ViewUser)
                .is_ok()
        );
        assert!(
            claims
                .authorize_self_or_privilege(institution_id, Uuid::new_v4(), PrivilegeKey::ViewUser)
                .is_err()
        );
    }

    #[test]
    fn admin_requires_realm_role() {
        let claims = claims(Uuid::new_v4(), Vec::new());
        assert!(claims.authorize_admin().is_err());
        assert!(claims.with_realm_role(ADMIN_REALM_ROLE).authorize_admin().is_ok());
    }
}
