use std::time::Duration;

use async_nats::jetstream::{self, stream};

use super::AuditLogEvent;
use crate::{Error, Result, TRACING_TARGET_STREAM};

/// JetStream stream holding audit events.
pub const AUDIT_STREAM_NAME: &str = "AUDIT_LOGS";

/// Events are published on `audit.<EVENT_TYPE>`.
pub const AUDIT_SUBJECT_PREFIX: &str = "audit";

const AUDIT_RETENTION: Duration = Duration::from_secs(90 * 24 * 60 * 60);

fn stream_config() -> stream::Config {
    stream::Config {
        name: AUDIT_STREAM_NAME.to_owned(),
        description: Some("Mutations made through the authorization service".to_owned()),
        subjects: vec![format!("{AUDIT_SUBJECT_PREFIX}.>")],
        max_age: AUDIT_RETENTION,
        ..Default::default()
    }
}

/// Writes [`AuditLogEvent`]s to the [`AUDIT_STREAM_NAME`] stream.
#[derive(Debug, Clone)]
pub struct AuditLogPublisher {
    jetstream: jetstream::Context,
}

impl AuditLogPublisher {
    /// Binds to the audit stream, creating it when it does not exist yet.
    pub async fn new(jetstream: &jetstream::Context) -> Result<Self> {
        let stream = jetstream
            .get_or_create_stream(stream_config())
            .await
            .map_err(|e| Error::Stream {
                stream: AUDIT_STREAM_NAME,
                reason: e.to_string(),
            })?;

        tracing::debug!(
            target: TRACING_TARGET_STREAM,
            stream = AUDIT_STREAM_NAME,
            subjects = ?stream.cached_info().config.subjects,
            "audit stream ready"
        );

        Ok(Self {
            jetstream: jetstream.clone(),
        })
    }

    /// Publishes `event` and waits until the server has stored it.
    pub async fn publish(&self, event: &AuditLogEvent) -> Result<()> {
        let subject = event.subject();
        let payload = serde_json::to_vec(event)?;
        let size = payload.len();

        let failed = |e: &dyn std::fmt::Display| Error::Publish {
            subject: subject.clone(),
            reason: e.to_string(),
        };
        let ack = self
            .jetstream
            .publish(subject.clone(), payload.into())
            .await
            .map_err(|e| failed(&e))?;
        ack.await.map_err(|e| failed(&e))?;

        tracing::debug!(
            target: TRACING_TARGET_STREAM,
            event_id = %event.id,
            %subject,
            size,
            "audit event stored"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_covers_every_audit_subject() {
        let config = stream_config();
        assert_eq!(config.name, AUDIT_STREAM_NAME);
        assert_eq!(config.subjects, ["audit.>"]);
        assert_eq!(config.max_age, Duration::from_secs(7_776_000));
    }
}
