use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::ensure;
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

const SHUTDOWN_TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=300;

/// Listener settings.
///
/// The per-request timeout is part of [`MiddlewareConfig`].
///
/// [`MiddlewareConfig`]: crate::config::MiddlewareConfig
#[derive(Debug, Clone, PartialEq, Eq, Args, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on; `0.0.0.0` for every interface.
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Port to listen on, 1024 or above.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Seconds in-flight requests may take to finish after SIGTERM.
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 30)]
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.port >= 1024,
            "port {} needs root privileges, use 1024 or above",
            self.port
        );
        ensure!(
            SHUTDOWN_TIMEOUT_RANGE.contains(&self.shutdown_timeout),
            "shutdown timeout of {}s is outside {}..={}s",
            self.shutdown_timeout,
            SHUTDOWN_TIMEOUT_RANGE.start(),
            SHUTDOWN_TIMEOUT_RANGE.end()
        );
        Ok(())
    }

    #[inline]
    pub const fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    #[inline]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    pub fn binds_to_all_interfaces(&self) -> bool {
        self.host.is_unspecified()
    }

    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            address = %self.server_addr(),
            shutdown_timeout_secs = self.shutdown_timeout,
            "server configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.binds_to_all_interfaces());
        assert_eq!(config.server_addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn privileged_ports_are_rejected() {
        let config = ServerConfig {
            port: 80,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn shutdown_timeout_bounds() {
        for (secs, valid) in [(0, false), (1, true), (300, true), (301, false)] {
            let config = ServerConfig {
                shutdown_timeout: secs,
                ..ServerConfig::default()
            };
            assert_eq!(config.validate().is_ok(), valid, "{secs}s");
        }
        assert_eq!(
            ServerConfig::default().shutdown_timeout(),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn unspecified_host_binds_everywhere() {
        let config = ServerConfig {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            ..ServerConfig::default()
        };
        assert!(config.binds_to_all_interfaces());
    }
}
