use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::Result;
use crate::event::EventType;
use crate::message::BridgeMessage;
use crate::model::{DoseLog, DoseSchedule, Medicine, UserProfile};

/// Bare `{success}` acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub const OK: Ack = Ack { success: true };
    pub const FAILED: Ack = Ack { success: false };
}

/// AUTH_RESULT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// SCHEDULE_LOAD_RESULT payload: every collection, unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSnapshot {
    pub medicines: Vec<Medicine>,
    pub schedules: Vec<DoseSchedule>,
    pub dose_logs: Vec<DoseLog>,
}

/// NOTIFICATION_RESULT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_ids: Option<Vec<String>>,
}

/// OFFLINE_SYNC_RESULT payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineSyncResult {
    pub success: bool,
    pub synced: usize,
}

/// A reply produced by the host, with its typed payload.
#[derive(Debug, Clone, PartialEq)]
pub enum HostReply {
    Auth(AuthResult),
    ProfileSaved(Ack),
    Profile(Option<UserProfile>),
    ScheduleSaved(Ack),
    Schedule(ScheduleSnapshot),
    DoseLogSaved(Ack),
    Notifications(NotificationResult),
    OfflineSynced(OfflineSyncResult),
    MessageSent(Ack),
    /// Immediate failure reply on the request's normal reply event.
    Failed { event: EventType, error: String },
}

impl HostReply {
    /// Event tag the reply travels under.
    pub fn event(&self) -> EventType {
        match self {
            HostReply::Auth(_) => EventType::AuthResult,
            HostReply::ProfileSaved(_) | HostReply::Profile(_) => EventType::ProfileLoadResult,
            HostReply::ScheduleSaved(_) | HostReply::Notifications(_) => {
                EventType::NotificationResult
            }
            HostReply::Schedule(_) => EventType::ScheduleLoadResult,
            HostReply::DoseLogSaved(_) => EventType::DoseLogSaveResult,
            HostReply::OfflineSynced(_) => EventType::OfflineSyncResult,
            HostReply::MessageSent(_) => EventType::SendMessageResult,
            HostReply::Failed { event, .. } => *event,
        }
    }

    /// Serialize the typed payload.
    pub fn payload(&self) -> Result<Value> {
        let value = match self {
            HostReply::Auth(p) => serde_json::to_value(p)?,
            HostReply::ProfileSaved(p)
            | HostReply::ScheduleSaved(p)
            | HostReply::DoseLogSaved(p)
            | HostReply::MessageSent(p) => serde_json::to_value(p)?,
            HostReply::Profile(p) => serde_json::to_value(p)?,
            HostReply::Schedule(p) => serde_json::to_value(p)?,
            HostReply::Notifications(p) => serde_json::to_value(p)?,
            HostReply::OfflineSynced(p) => serde_json::to_value(p)?,
            HostReply::Failed { error, .. } => json!({ "success": false, "error": error }),
        };
        Ok(value)
    }

    /// Build the reply message correlated with `request_id`.
    pub fn into_message(self, request_id: Uuid) -> Result<BridgeMessage> {
        let payload = self.payload()?;
        Ok(BridgeMessage::new(self.event(), request_id, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_absent_is_null() {
        let payload = HostReply::Profile(None).payload().unwrap();
        assert_eq!(payload, Value::Null);
    }

    #[test]
    fn notification_result_shapes() {
        let scheduled = HostReply::Notifications(NotificationResult {
            success: true,
            notification_ids: Some(vec!["n1".to_string(), "n2".to_string()]),
        });
        assert_eq!(
            scheduled.payload().unwrap(),
            json!({"success": true, "notificationIds": ["n1", "n2"]})
        );

        let saved = HostReply::ScheduleSaved(Ack::OK);
        assert_eq!(saved.event(), EventType::NotificationResult);
        assert_eq!(saved.payload().unwrap(), json!({"success": true}));
    }

    #[test]
    fn snapshot_uses_dose_logs_key() {
        let payload = HostReply::Schedule(ScheduleSnapshot::default())
            .payload()
            .unwrap();
        assert_eq!(
            payload,
            json!({"medicines": [], "schedules": [], "doseLogs": []})
        );
    }

    #[test]
    fn failed_reply_keeps_event_and_request_id() {
        let request_id = Uuid::new_v4();
        let msg = HostReply::Failed {
            event: EventType::DoseLogSaveResult,
            error: "disk full".to_string(),
        }
        .into_message(request_id)
        .unwrap();

        assert_eq!(msg.event, EventType::DoseLogSaveResult);
        assert_eq!(msg.request_id, request_id);
        assert_eq!(msg.payload, json!({"success": false, "error": "disk full"}));
    }

    #[test]
    fn auth_result_method_optional() {
        let bridge = HostReply::Auth(AuthResult {
            success: true,
            method: Some("bridge".to_string()),
        });
        assert_eq!(
            bridge.payload().unwrap(),
            json!({"success": true, "method": "bridge"})
        );
        let plain = HostReply::Auth(AuthResult {
            success: true,
            method: None,
        });
        assert_eq!(plain.payload().unwrap(), json!({"success": true}));
    }
}
