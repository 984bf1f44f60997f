//! Errors of the NATS client and audit publisher.

use std::time::Duration;

/// Result of NATS operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid NATS configuration: {0}")]
    InvalidConfig(String),

    /// The server could not be reached or dropped the connection.
    #[error("NATS connection failed: {0}")]
    Connection(#[source] async_nats::Error),

    #[error("no answer from NATS within {0:?}")]
    Timeout(Duration),

    /// Creating or looking up a JetStream stream failed.
    #[error("stream {stream} is unavailable: {reason}")]
    Stream { stream: &'static str, reason: String },

    /// The server did not acknowledge a published message.
    #[error("publish to {subject} was not acknowledged: {reason}")]
    Publish { subject: String, reason: String },

    #[error("could not encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

impl Error {
    /// Returns whether a later attempt may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Timeout(_) | Self::Publish { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors() {
        assert!(Error::Timeout(Duration::from_secs(1)).is_transient());
        assert!(
            Error::Publish {
                subject: "audit.CREATE_ROLE".to_owned(),
                reason: "no responders".to_owned(),
            }
            .is_transient()
        );
        assert!(!Error::InvalidConfig("empty url".to_owned()).is_transient());
    }

    #[test]
    fn stream_errors_name_the_stream() {
        let error = Error::Stream {
            stream: "AUDIT_LOGS",
            reason: "insufficient resources".to_owned(),
        };
        assert_eq!(
            error.to_string(),
            "stream AUDIT_LOGS is unavailable: insufficient resources"
        );
    }
}
