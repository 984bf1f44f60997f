use std::fmt;
use std::time::Duration;

use crate::{Error, Result};

const CLIENT_NAME: &str = "authz-service";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const PING_INTERVAL: Duration = Duration::from_secs(30);
const MAX_RECONNECTS: usize = 10;

/// Base delay between reconnect attempts; doubled per attempt.
pub(super) const RECONNECT_BASE_DELAY: Duration = Duration::from_secs(2);
pub(super) const RECONNECT_MAX_DELAY: Duration = Duration::from_secs(30);

/// Settings for [`NatsClient::connect`].
///
/// [`NatsClient::connect`]: crate::NatsClient::connect
#[derive(Clone, PartialEq, Eq)]
pub struct NatsConfig {
    servers: Vec<String>,
    token: Option<String>,
    client_name: String,
    connect_timeout: Duration,
    max_reconnects: Option<usize>,
}

impl NatsConfig {
    /// Parses a server list such as `nats://a:4222, tls://b:4222`.
    pub fn new(servers: &str) -> Self {
        Self {
            servers: servers.split(',').map(|s| s.trim().to_owned()).collect(),
            token: None,
            client_name: CLIENT_NAME.to_owned(),
            connect_timeout: CONNECT_TIMEOUT,
            max_reconnects: Some(MAX_RECONNECTS),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Limits reconnect attempts; `0` retries forever.
    pub fn with_max_reconnects(mut self, attempts: usize) -> Self {
        self.max_reconnects = (attempts > 0).then_some(attempts);
        self
    }

    #[inline]
    pub fn servers(&self) -> &[String] {
        &self.servers
    }

    #[inline]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[inline]
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    #[inline]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    #[inline]
    pub fn ping_interval(&self) -> Duration {
        PING_INTERVAL
    }

    /// `None` means unlimited.
    #[inline]
    pub fn max_reconnects(&self) -> Option<usize> {
        self.max_reconnects
    }

    /// Checks that every server uses the `nats://` or `tls://` scheme.
    pub fn validate(&self) -> Result<()> {
        if let Some(server) = self
            .servers
            .iter()
            .find(|s| !(s.starts_with("nats://") || s.starts_with("tls://")))
        {
            return Err(Error::InvalidConfig(format!(
                "server '{server}' must use the nats:// or tls:// scheme"
            )));
        }

        if self.token.as_deref() == Some("") {
            return Err(Error::InvalidConfig("token is set but empty".to_owned()));
        }

        if self.connect_timeout.is_zero() {
            return Err(Error::InvalidConfig("connect timeout must be positive".to_owned()));
        }

        Ok(())
    }
}

impl fmt::Debug for NatsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NatsConfig")
            .field("servers", &self.servers)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("client_name", &self.client_name)
            .field("connect_timeout", &self.connect_timeout)
            .field("max_reconnects", &self.max_reconnects)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_list_is_split() {
        let config = NatsConfig::new("nats://a:4222, tls://b:4222");
        assert_eq!(config.servers(), ["nats://a:4222", "tls://b:4222"]);
        assert_eq!(config.client_name(), CLIENT_NAME);
        assert_eq!(config.max_reconnects(), Some(MAX_RECONNECTS));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_reconnects_is_unlimited() {
        let config = NatsConfig::new("nats://localhost:4222").with_max_reconnects(0);
        assert_eq!(config.max_reconnects(), None);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        assert!(NatsConfig::new("").validate().is_err());
        assert!(NatsConfig::new("http://localhost:4222").validate().is_err());
        assert!(
            NatsConfig::new("nats://localhost:4222")
                .with_token("")
                .validate()
                .is_err()
        );
        assert!(
            NatsConfig::new("nats://localhost:4222")
                .with_connect_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn debug_hides_token() {
        let config = NatsConfig::new("nats://localhost:4222").with_token("s3cr3t");
        assert!(!format!("{config:?}").contains("s3cr3t"));
    }
}
