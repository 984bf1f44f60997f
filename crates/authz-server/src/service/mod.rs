//! Application state and dependency injection.

mod audit;
mod security;
mod service_config;

use authz_postgres::PgClient;

pub use crate::service::audit::{AuditLog, snapshot};
pub use crate::service::security::{AuthKeys, AuthKeysConfig};
pub use crate::service::service_config::{ServiceConfig, ServiceConfigBuilder};
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    // External services:
    pub postgres: PgClient,
    pub audit_log: AuditLog,

    // Internal services:
    pub auth_keys: AuthKeys,
}

impl ServiceState {
    /// Assembles the state from already constructed services.
    pub fn new(postgres: PgClient, audit_log: AuditLog, auth_keys: AuthKeys) -> Self {
        Self {
            postgres,
            audit_log,
            auth_keys,
        }
    }

    /// Initializes application state from configuration.
    ///
    /// Runs database migrations, connects to NATS when configured and loads
    /// the token verification keys.
    pub async fn from_config(service_config: &ServiceConfig) -> Result<Self> {
        service_config.validate()?;

        let service_state = Self {
            postgres: service_config.connect_postgres().await?,
            audit_log: service_config.connect_audit_log().await?,
            auth_keys: service_config.load_auth_keys().await?,
        };

        Ok(service_state)
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// External services:
impl_di!(postgres: PgClient);
impl_di!(audit_log: AuditLog);

// Internal services:
impl_di!(auth_keys: AuthKeys);
