use std::sync::Arc;
use std::time::Duration;

use async_nats::connection::State;
use async_nats::{Client, ConnectOptions, jetstream};
use tokio::time::timeout;

use super::nats_config::{NatsConfig, RECONNECT_BASE_DELAY, RECONNECT_MAX_DELAY};
use crate::audit::AuditLogPublisher;
use crate::{Error, Result, TRACING_TARGET_CONNECTION};

/// Connected NATS client.
///
/// `async-nats` multiplexes everything over one connection, so clones are
/// cheap and share it.
#[derive(Debug, Clone)]
pub struct NatsClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    client: Client,
    jetstream: jetstream::Context,
    config: NatsConfig,
}

/// Exponential backoff capped at [`RECONNECT_MAX_DELAY`].
fn reconnect_delay(attempt: usize) -> Duration {
    let factor = 1u32 << attempt.min(8);
    RECONNECT_BASE_DELAY
        .saturating_mul(factor)
        .min(RECONNECT_MAX_DELAY)
}

impl NatsClient {
    /// Connects to the first reachable server of `config`.
    pub async fn connect(config: NatsConfig) -> Result<Self> {
        config.validate()?;

        let mut options = ConnectOptions::new()
            .name(config.client_name())
            .ping_interval(config.ping_interval())
            .connection_timeout(config.connect_timeout())
            .reconnect_delay_callback(reconnect_delay);
        if let Some(token) = config.token() {
            options = options.token(token.to_owned());
        }
        if let Some(attempts) = config.max_reconnects() {
            options = options.max_reconnects(attempts);
        }

        let servers = config.servers().join(",");
        tracing::info!(target: TRACING_TARGET_CONNECTION, %servers, "connecting to NATS");

        let client = timeout(
            config.connect_timeout(),
            async_nats::connect_with_options(servers.as_str(), options),
        )
        .await
        .map_err(|_| Error::Timeout(config.connect_timeout()))?
        .map_err(|e| Error::Connection(Box::new(e)))?;

        let info = client.server_info();
        tracing::info!(
            target: TRACING_TARGET_CONNECTION,
            host = %info.host,
            version = %info.version,
            "connected to NATS"
        );

        let jetstream = jetstream::new(client.clone());
        Ok(Self {
            inner: Arc::new(Inner {
                client,
                jetstream,
                config,
            }),
        })
    }

    #[inline]
    pub fn config(&self) -> &NatsConfig {
        &self.inner.config
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.inner.client.connection_state(), State::Connected)
    }

    /// Returns a publisher for the audit stream, creating the stream first
    /// when it is missing.
    pub async fn audit_log_publisher(&self) -> Result<AuditLogPublisher> {
        AuditLogPublisher::new(&self.inner.jetstream).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_until_capped() {
        assert_eq!(reconnect_delay(0), Duration::from_secs(2));
        assert_eq!(reconnect_delay(1), Duration::from_secs(4));
        assert_eq!(reconnect_delay(3), Duration::from_secs(16));
        assert_eq!(reconnect_delay(4), RECONNECT_MAX_DELAY);
        assert_eq!(reconnect_delay(usize::MAX), RECONNECT_MAX_DELAY);
    }

    #[tokio::test]
    async fn invalid_config_fails_before_connecting() {
        let result = NatsClient::connect(NatsConfig::new("http://localhost:4222")).await;
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
