//! Audit log event payload.

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

/// Kind of mutation recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventType {
    CreateInstitution,
    ModifyInstitution,
    CreateDepartment,
    ModifyDepartment,
    RemoveDepartment,
    CreateRole,
    ModifyRole,
    RemoveRole,
    CreateUser,
    ModifyUser,
    ActivateUser,
    DeactivateUser,
    ArchiveUser,
    RemoveUser,
    ImportUsers,
    ExportUsers,
    ModifyInstitutionVacations,
    ModifyUserVacations,
}

/// Kind of object an audit event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditObjectType {
    Institution,
    Department,
    Role,
    InstitutionUser,
    InstitutionVacation,
    InstitutionUserVacation,
}

/// A single audit log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEvent {
    /// Unique event identifier.
    pub id: Uuid,
    /// What happened.
    pub event_type: AuditEventType,
    /// When it happened.
    pub happened_at: Timestamp,
    /// Personal identification code of the acting person.
    pub acting_user_pic: Option<String>,
    /// Institution user the actor was acting as.
    pub acting_institution_user_id: Option<Uuid>,
    /// Institution in which the event took place.
    pub institution_id: Option<Uuid>,
    /// Kind of the affected object.
    pub object_type: AuditObjectType,
    /// Identifier of the affected object.
    pub object_identity: String,
    /// Snapshot before the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre: Option<serde_json::Value>,
    /// Snapshot after the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<serde_json::Value>,
}

impl AuditLogEvent {
    /// Creates a new event that happened now.
    pub fn new(
        event_type: AuditEventType,
        object_type: AuditObjectType,
        object_identity: impl ToString,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            event_type,
            happened_at: Timestamp::now(),
            acting_user_pic: None,
            acting_institution_user_id: None,
            institution_id: None,
            object_type,
            object_identity: object_identity.to_string(),
            pre: None,
            post: None,
        }
    }

    /// Sets the acting person.
    #[must_use]
    pub fn with_actor(
        mut self,
        pic: impl Into<String>,
        institution_user_id: Option<Uuid>,
    ) -> Self {
        self.acting_user_pic = Some(pic.into());
        self.acting_institution_user_id = institution_user_id;
        self
    }

    /// Sets the institution.
    #[must_use]
    pub fn with_institution(mut self, institution_id: Uuid) -> Self {
        self.institution_id = Some(institution_id);
        self
    }

    /// Attaches the object state before the change.
    #[must_use]
    pub fn with_pre(mut self, pre: serde_json::Value) -> Self {
        self.pre = Some(pre);
        self
    }

    /// Attaches the object state after the change.
    #[must_use]
    pub fn with_post(mut self, post: serde_json::Value) -> Self {
        self.post = Some(post);
        self
    }

    /// Returns the subject this event is published on.
    pub fn subject(&self) -> String {
        format!("{}.{}", super::AUDIT_SUBJECT_PREFIX, self.event_type)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn builder_fills_actor_and_snapshots() {
        let role_id = Uuid::new_v4();
        let institution_id = Uuid::new_v4();
        let event = AuditLogEvent::new(AuditEventType::ModifyRole, AuditObjectType::Role, role_id)
            .with_actor("38001085718", None)
            .with_institution(institution_id)
            .with_pre(json!({ "name": "Old" }))
            .with_post(json!({ "name": "New" }));

        assert_eq!(event.object_identity, role_id.to_string());
        assert_eq!(event.institution_id, Some(institution_id));
        assert_eq!(event.acting_user_pic.as_deref(), Some("38001085718"));
        assert_eq!(event.subject(), "audit.MODIFY_ROLE");
    }

    #[test]
    fn serializes_camel_case_and_skips_empty_snapshots() {
        let event = AuditLogEvent::new(
            AuditEventType::ArchiveUser,
            AuditObjectType::InstitutionUser,
            "x",
        );
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["eventType"], "ARCHIVE_USER");
        assert_eq!(value["objectType"], "INSTITUTION_USER");
        assert!(value.get("pre").is_none());
        assert!(value.get("happenedAt").is_some());
    }
}
