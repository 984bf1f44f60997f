//! Access token claims issued by Keycloak.

use authz_postgres::types::PrivilegeKey;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::decode;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::handler::{Error, ErrorKind, Result};
use crate::service::AuthKeys;
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION;

/// Keycloak realm role granting platform administration.
pub const ADMIN_REALM_ROLE: &str = "admin";

/// Claims of a verified access token.
///
/// | Claim          | Field            | Description |
/// |----------------|------------------|-------------|
/// | `iss`          | `issuer`         | Keycloak realm URL |
/// | `sub`          | `subject`        | Keycloak user id |
/// | `iat`          | `issued_at`      | Issue time, seconds since epoch |
/// | `exp`          | `expires_at`     | Expiry time, seconds since epoch |
/// | `realm_access` | `realm_access`   | Keycloak realm roles |
/// | `authz`        | `authz`          | Institution context of the session |
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthClaims {
    /// Issuer (the Keycloak realm).
    #[serde(rename = "iss", default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    /// Subject (the Keycloak user id).
    #[serde(rename = "sub")]
    pub subject: String,

    /// Issued at.
    #[serde(rename = "iat", with = "jiff::fmt::serde::timestamp::second::required")]
    pub issued_at: Timestamp,
    /// Expiration time.
    #[serde(rename = "exp", with = "jiff::fmt::serde::timestamp::second::required")]
    pub expires_at: Timestamp,

    /// Realm-level roles.
    #[serde(default)]
    pub realm_access: RealmAccess,
    /// Institution context of the session.
    pub authz: AuthzClaim,
}

/// The standard Keycloak `realm_access` claim.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RealmAccess {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// The custom `authz` claim added by the Keycloak protocol mapper.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthzClaim {
    /// Personal identification code of the person.
    pub personal_identification_code: String,
    /// Local user id, once the person has a user row.
    #[serde(default)]
    pub user_id: Option<Uuid>,
    /// Membership the session acts as.
    #[serde(default)]
    pub institution_user_id: Option<Uuid>,
    /// Institution selected for the session.
    #[serde(default)]
    pub selected_institution: Option<SelectedInstitution>,
    /// Privileges granted by the membership's roles.
    #[serde(default)]
    pub privileges: Vec<PrivilegeKey>,
}

/// Institution chosen by the person when the session was created.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SelectedInstitution {
    pub id: Uuid,
    pub name: String,
}

impl AuthClaims {
    /// Creates claims valid from now for `lifetime`.
    pub fn new(subject: impl Into<String>, authz: AuthzClaim, lifetime: SignedDuration) -> Self {
        let issued_at = Timestamp::now();
        Self {
            issuer: None,
            subject: subject.into(),
            issued_at,
            expires_at: issued_at.saturating_add(lifetime).unwrap_or(issued_at),
            realm_access: RealmAccess::default(),
            authz,
        }
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Adds a realm role.
    pub fn with_realm_role(mut self, role: impl Into<String>) -> Self {
        self.realm_access.roles.push(role.into());
        self
    }

    /// Returns whether the token has expired.
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Timestamp::now()
    }

    /// Returns the remaining lifetime, or zero once expired.
    #[inline]
    #[must_use]
    pub fn remaining_lifetime(&self) -> SignedDuration {
        let remaining = self.expires_at.duration_since(Timestamp::now());
        if remaining.is_positive() {
            remaining
        } else {
            SignedDuration::ZERO
        }
    }

    /// Returns whether the realm roles include [`ADMIN_REALM_ROLE`].
    #[inline]
    pub fn has_admin_role(&self) -> bool {
        self.realm_access
            .roles
            .iter()
            .any(|role| role == ADMIN_REALM_ROLE)
    }

    /// Verifies a bearer token and returns its claims.
    pub fn from_header(
        auth_header: TypedHeader<Authorization<Bearer>>,
        auth_keys: &AuthKeys,
    ) -> Result<Self> {
        let validation = auth_keys.validation();

        tracing::trace!(
            target: TRACING_TARGET_AUTHENTICATION,
            algorithm = ?auth_keys.algorithm(),
            issuer = auth_keys.issuer(),
            "verifying access token",
        );

        let claims = decode::<Self>(auth_header.token(), auth_keys.decoding_key(), &validation)?
            .claims;

        // `Validation::leeway` admits tokens a little past `exp`.
        if claims.is_expired() {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                subject = %claims.subject,
                expired_at = %claims.expires_at,
                "rejected access token past its expiry"
            );
            return Err(ErrorKind::TokenExpired.with_resource("authentication"));
        }

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            subject = %claims.subject,
            institution_user_id = ?claims.authz.institution_user_id,
            privileges = claims.authz.privileges.len(),
            remaining = ?claims.remaining_lifetime(),
            "access token accepted"
        );

        Ok(claims)
    }
}

impl From<JwtError> for Error<'static> {
    fn from(error: JwtError) -> Self {
        let kind = error.kind();
        let mapped = match kind {
            JwtErrorKind::ExpiredSignature => ErrorKind::TokenExpired.into_error(),
            // Signed by someone else, or meant for someone else.
            JwtErrorKind::InvalidSignature
            | JwtErrorKind::InvalidIssuer
            | JwtErrorKind::InvalidAudience
            | JwtErrorKind::InvalidSubject
            | JwtErrorKind::ImmatureSignature => ErrorKind::Unauthorized
                .with_message("The access token was not issued for this service"),
            // Not a token we can read at all.
            JwtErrorKind::InvalidToken
            | JwtErrorKind::InvalidAlgorithm
            | JwtErrorKind::Base64(_)
            | JwtErrorKind::Utf8(_) => ErrorKind::MalformedAuthToken.into_error(),
            JwtErrorKind::Json(_) => ErrorKind::MalformedAuthToken
                .with_message("The access token carries no usable `authz` claim"),
            JwtErrorKind::MissingRequiredClaim(claim) => ErrorKind::MalformedAuthToken
                .with_message(format!("The access token has no `{claim}` claim")),
            _ => {
                tracing::error!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    error = %error,
                    "access token verification failed unexpectedly"
                );
                ErrorKind::InternalServerError.into_error()
            }
        };

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            reason = ?kind,
            "rejected access token"
        );
        mapped.with_resource("authentication")
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};

    use super::*;

    const SECRET: &str = "an-hs256-secret-for-local-development";
    const ISSUER: &str = "https://sso.test/realms/tv";

    fn authz() -> AuthzClaim {
        AuthzClaim {
            personal_identification_code: "37605030299".to_owned(),
            user_id: Some(Uuid::new_v4()),
            institution_user_id: Some(Uuid::new_v4()),
            selected_institution: Some(SelectedInstitution {
                id: Uuid::new_v4(),
                name: "Tõlkebüroo".to_owned(),
            }),
            privileges: vec![PrivilegeKey::ViewUser, PrivilegeKey::AddRole],
        }
    }

    fn bearer(claims: &AuthClaims) -> TypedHeader<Authorization<Bearer>> {
        let token = encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("claims should encode");
        TypedHeader(Authorization::bearer(&token).expect("token should be a valid bearer"))
    }

    #[test]
    fn decode_valid_token() {
        let keys = AuthKeys::from_secret(SECRET, Some(ISSUER.to_owned()));
        let claims = AuthClaims::new("kc-user", authz(), SignedDuration::from_mins(5))
            .with_issuer(ISSUER)
            .with_realm_role(ADMIN_REALM_ROLE);

        let decoded = AuthClaims::from_header(bearer(&claims), &keys).expect("token is valid");
        assert_eq!(decoded.subject, "kc-user");
        assert_eq!(decoded.authz, claims.authz);
        assert!(decoded.has_admin_role());
    }

    #[test]
    fn reject_foreign_issuer() {
        let keys = AuthKeys::from_secret(SECRET, Some(ISSUER.to_owned()));
        let claims = AuthClaims::new("kc-user", authz(), SignedDuration::from_mins(5))
            .with_issuer("https://elsewhere.test/realms/tv");

        let error = AuthClaims::from_header(bearer(&claims), &keys).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn reject_expired_token() {
        let keys = AuthKeys::from_secret(SECRET, None);
        let mut claims = AuthClaims::new("kc-user", authz(), SignedDuration::from_mins(5));
        claims.expires_at = Timestamp::now() - SignedDuration::from_hours(1);

        let error = AuthClaims::from_header(bearer(&claims), &keys).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TokenExpired);
    }

    #[test]
    fn reject_wrong_secret() {
        let keys = AuthKeys::from_secret("another-secret-of-sufficient-length", None);
        let claims = AuthClaims::new("kc-user", authz(), SignedDuration::from_mins(5));

        let error = AuthClaims::from_header(bearer(&claims), &keys).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
    }
}
