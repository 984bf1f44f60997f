use authz_nats::NatsClient;
use authz_nats::audit::{AuditLogEvent, AuditLogPublisher};
use serde::Serialize;

use crate::extract::{AuthClaims, AuthProvider};
use crate::utility::tracing_targets::TRACING_TARGET_AUDIT as TRACING_TARGET;

/// Publishes audit events to JetStream when NATS is configured.
///
/// Publishing never fails the caller: errors are logged and dropped. Without
/// NATS the events are only logged at debug level.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    nats: Option<NatsClient>,
    publisher: Option<AuditLogPublisher>,
}

impl AuditLog {
    /// Creates an audit log that publishes through `nats`.
    pub async fn connect(nats: NatsClient) -> crate::Result<Self> {
        let publisher = nats.audit_log_publisher().await?;
        Ok(Self {
            nats: Some(nats),
            publisher: Some(publisher),
        })
    }

    /// Creates an audit log that only writes debug logs.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Returns whether events are published to NATS.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.publisher.is_some()
    }

    /// Returns the NATS connection state, if NATS is configured.
    pub fn is_connected(&self) -> Option<bool> {
        self.nats.as_ref().map(NatsClient::is_connected)
    }

    /// Publishes `event` on behalf of the caller described by `auth`.
    pub async fn record(&self, auth: &AuthClaims, event: AuditLogEvent) {
        let event = event.with_actor(
            auth.personal_identification_code(),
            auth.institution_user_id(),
        );
        self.publish(event).await;
    }

    /// Publishes `event` as is.
    pub async fn publish(&self, event: AuditLogEvent) {
        let Some(publisher) = &self.publisher else {
            tracing::debug!(
                target: TRACING_TARGET,
                event_id = %event.id,
                event_type = %event.event_type,
                object_type = %event.object_type,
                object_identity = %event.object_identity,
                "Audit event not published: NATS is not configured"
            );
            return;
        };

        if let Err(error) = publisher.publish(&event).await {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                event_id = %event.id,
                event_type = %event.event_type,
                "Failed to publish audit event"
            );
        }
    }
}

/// Serializes a snapshot for the `pre`/`post` fields of an audit event.
pub fn snapshot<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|error| {
        tracing::warn!(
            target: TRACING_TARGET,
            error = %error,
            "Failed to serialize audit snapshot"
        );
        serde_json::Value::Null
    })
}

#[cfg(test)]
mod tests {
    use authz_nats::audit::{AuditEventType, AuditObjectType};
    use jiff::SignedDuration;
    use uuid::Uuid;

    use super::*;
    use crate::extract::AuthzClaim;

    #[tokio::test]
    async fn disabled_log_accepts_events() {
        let audit = AuditLog::disabled();
        assert!(!audit.is_enabled());
        assert_eq!(audit.is_connected(), None);

        let authz = AuthzClaim {
            personal_identification_code: "37605030299".to_owned(),
            ..AuthzClaim::default()
        };
        let auth = AuthClaims::new("kc-user", authz, SignedDuration::from_mins(5));
        let event = AuditLogEvent::new(
            AuditEventType::CreateDepartment,
            AuditObjectType::Department,
            Uuid::new_v4(),
        );

        audit.record(&auth, event).await;
    }

    #[test]
    fn snapshot_serializes_values() {
        let value = snapshot(&serde_json::json!({ "name": "Tõlge" }));
        assert_eq!(value["name"], "Tõlge");
    }
}
