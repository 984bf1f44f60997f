use std::io;
use std::net::SocketAddr;

/// Result of running the HTTP server.
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Failure to bind or run the HTTP listener.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("cannot listen on {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Accepting connections failed after the listener was up.
    #[error("server stopped unexpectedly: {0}")]
    Runtime(#[source] io::Error),
}

impl ServerError {
    /// Stable code for log queries.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Bind { .. } => "SERVER_BIND",
            Self::Runtime(_) => "SERVER_RUNTIME",
        }
    }

    fn io_error(&self) -> &io::Error {
        match self {
            Self::Bind { source, .. } | Self::Runtime(source) => source,
        }
    }

    /// What an operator can change to get past the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        Some(match self.io_error().kind() {
            io::ErrorKind::AddrInUse => "Another process holds the port; stop it or set PORT",
            io::ErrorKind::AddrNotAvailable => "HOST is not an address of this machine",
            io::ErrorKind::PermissionDenied => "Use a port of 1024 or above",
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, SocketAddr};

    use super::*;

    #[test]
    fn bind_error_has_suggestion() {
        let error = ServerError::Bind {
            address: SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)),
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };

        assert_eq!(error.error_code(), "SERVER_BIND");
        assert!(error.to_string().contains("127.0.0.1:3000"));
        assert!(error.suggestion().is_some_and(|s| s.contains("PORT")));
    }

    #[test]
    fn unknown_runtime_error_has_no_suggestion() {
        let error = ServerError::Runtime(io::Error::other("boom"));
        assert_eq!(error.error_code(), "SERVER_RUNTIME");
        assert!(error.suggestion().is_none());
    }
}
