//! Verification keys for Keycloak access tokens.
//!
//! Production deployments verify RS256 tokens against the realm public key.
//! Development and tests may use a shared HS256 secret instead.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::utility::tracing_targets::TRACING_TARGET_AUTH_KEYS as TRACING_TARGET;
use crate::{Error, Result};

/// Token verification configuration.
///
/// Exactly one of `public_key_path` and `jwt_secret` must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct AuthKeysConfig {
    /// File path to the Keycloak realm public key (PEM).
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long = "keycloak-public-key", env = "KEYCLOAK_REALM_PUBLIC_KEY_PATH")
    )]
    pub public_key_path: Option<PathBuf>,

    /// Shared HS256 secret, used instead of the realm public key.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long = "keycloak-jwt-secret", env = "KEYCLOAK_JWT_SECRET")
    )]
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,

    /// Expected `iss` claim, e.g. `https://sso.example.com/realms/tv`.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long = "keycloak-issuer", env = "KEYCLOAK_ISSUER")
    )]
    pub issuer: Option<String>,

    /// Expected `aud` claim. Audience is not checked when unset.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long = "keycloak-audience", env = "KEYCLOAK_AUDIENCE")
    )]
    pub audience: Option<String>,
}

impl AuthKeysConfig {
    /// Creates a configuration verifying tokens with the realm public key.
    pub fn with_public_key(path: impl AsRef<Path>) -> Self {
        Self {
            public_key_path: Some(path.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    /// Creates a configuration verifying tokens with a shared secret.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: Some(secret.into()),
            ..Self::default()
        }
    }

    /// Sets the expected issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Sets the expected audience.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        match (&self.public_key_path, &self.jwt_secret) {
            (None, None) => Err(Error::config(
                "either a realm public key path or a JWT secret must be configured",
            )),
            (Some(_), Some(_)) => Err(Error::config(
                "realm public key path and JWT secret are mutually exclusive",
            )),
            (Some(path), None) if !path.is_file() => {
                Err(Error::config("realm public key path is not a file"))
            }
            (None, Some(secret)) if secret.len() < 32 => {
                Err(Error::config("JWT secret must be at least 32 bytes long"))
            }
            _ => Ok(()),
        }
    }
}

/// Keys and rules used to verify access tokens.
///
/// Cloning is cheap; all clones share the same key material.
#[derive(Clone)]
pub struct AuthKeys {
    inner: Arc<AuthKeysInner>,
}

struct AuthKeysInner {
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: Option<String>,
    audience: Option<String>,
}

impl AuthKeys {
    /// Loads verification keys from the provided configuration.
    pub async fn from_config(config: &AuthKeysConfig) -> Result<Self> {
        config.validate()?;

        let (decoding_key, algorithm) = match (&config.public_key_path, &config.jwt_secret) {
            (Some(path), _) => (Self::load_public_key(path).await?, Algorithm::RS256),
            (None, Some(secret)) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    "Verifying access tokens with a shared secret",
                );
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
            (None, None) => return Err(Error::config("no token verification key configured")),
        };

        tracing::info!(
            target: TRACING_TARGET,
            algorithm = ?algorithm,
            issuer = config.issuer.as_deref(),
            audience = config.audience.as_deref(),
            "Token verification keys loaded",
        );

        Ok(Self::from_parts(
            decoding_key,
            algorithm,
            config.issuer.clone(),
            config.audience.clone(),
        ))
    }

    /// Creates HS256 verification keys from a shared secret.
    pub fn from_secret(secret: impl AsRef<[u8]>, issuer: Option<String>) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        Self::from_parts(decoding_key, Algorithm::HS256, issuer, None)
    }

    fn from_parts(
        decoding_key: DecodingKey,
        algorithm: Algorithm,
        issuer: Option<String>,
        audience: Option<String>,
    ) -> Self {
        let inner = AuthKeysInner {
            decoding_key,
            algorithm,
            issuer,
            audience,
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Returns the key used to verify token signatures.
    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    /// Returns the expected signature algorithm.
    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.inner.algorithm
    }

    /// Returns the expected issuer, if any.
    #[inline]
    pub fn issuer(&self) -> Option<&str> {
        self.inner.issuer.as_deref()
    }

    /// Builds the validation rules applied to every access token.
    pub fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.inner.algorithm);
        validation.validate_exp = true;
        validation.validate_nbf = false;

        let mut required = vec!["exp", "iat", "sub"];
        if let Some(issuer) = &self.inner.issuer {
            validation.set_issuer(&[issuer]);
            required.push("iss");
        }

        match &self.inner.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.push("aud");
            }
            None => validation.validate_aud = false,
        }

        validation.set_required_spec_claims(&required);
        validation
    }

    async fn load_public_key(path: &Path) -> Result<DecodingKey> {
        tracing::debug!(
            target: TRACING_TARGET,
            path = %path.display(),
            "Loading realm public key",
        );

        let pem_data = tokio::fs::read(path).await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                path = %path.display(),
                error = %e,
                "Failed to read realm public key file",
            );
            Error::file_system("failed to read realm public key file").with_source(e)
        })?;

        DecodingKey::from_rsa_pem(&pem_data).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                path = %path.display(),
                error = %e,
                "Failed to parse realm public key",
            );
            Error::auth("invalid realm public key PEM format").with_source(e)
        })
    }
}

impl fmt::Debug for AuthKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthKeys")
            .field("algorithm", &self.inner.algorithm)
            .field("issuer", &self.inner.issuer)
            .field("audience", &self.inner.audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const SECRET: &str = "an-hs256-secret-for-local-development";

    #[test]
    fn config_requires_exactly_one_key() {
        assert!(AuthKeysConfig::default().validate().is_err());

        let both = AuthKeysConfig {
            public_key_path: Some("./realm.pem".into()),
            jwt_secret: Some(SECRET.to_owned()),
            ..AuthKeysConfig::default()
        };
        assert!(both.validate().is_err());

        assert!(AuthKeysConfig::with_secret("short").validate().is_err());
        assert!(AuthKeysConfig::with_secret(SECRET).validate().is_ok());
    }

    #[tokio::test]
    async fn secret_keys_use_hs256() -> anyhow::Result<()> {
        let config = AuthKeysConfig::with_secret(SECRET).with_issuer("https://sso.test/realms/tv");
        let keys = AuthKeys::from_config(&config).await?;

        assert_eq!(keys.algorithm(), Algorithm::HS256);
        assert_eq!(keys.issuer(), Some("https://sso.test/realms/tv"));

        let validation = keys.validation();
        assert!(!validation.validate_aud);
        assert!(validation.required_spec_claims.contains("iss"));
        Ok(())
    }

    #[test]
    fn audience_is_required_when_configured() {
        let keys = AuthKeys::from_parts(
            DecodingKey::from_secret(SECRET.as_bytes()),
            Algorithm::HS256,
            None,
            Some("authz".to_owned()),
        );

        let validation = keys.validation();
        assert!(validation.validate_aud);
        assert!(validation.required_spec_claims.contains("aud"));
    }

    #[tokio::test]
    async fn reject_invalid_public_key() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("realm.pem");
        fs::write(&path, "not a pem file")?;

        let config = AuthKeysConfig::with_public_key(&path);
        assert!(AuthKeys::from_config(&config).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn reject_missing_public_key() {
        let config = AuthKeysConfig::with_public_key("./does-not-exist.pem");
        assert!(AuthKeys::from_config(&config).await.is_err());
    }
}
