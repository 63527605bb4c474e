use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MessageError, Result};
use crate::event::EventType;
use crate::message::BridgeMessage;
use crate::model::{DoseLog, DoseSchedule, Medicine, Theme, UserProfile};

/// AUTH_SETUP payload. The PIN arrives already hashed by the content side.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSetup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_biometric: Option<bool>,
}

impl fmt::Debug for AuthSetup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("AuthSetup");
        if let Some(hash) = &self.pin_hash {
            dbg.field("pin_hash", &format_args!("<redacted:{} bytes>", hash.len()));
        } else {
            dbg.field("pin_hash", &Option::<String>::None);
        }
        dbg.field("enable_biometric", &self.enable_biometric).finish()
    }
}

/// SCHEDULE_SAVE payload. Either part may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSave {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicine: Option<Medicine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<DoseSchedule>,
}

/// NOTIFICATION_SCHEDULE payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSchedule {
    pub medicine_name: String,
    pub scheduled_times: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<String>,
}

/// NOTIFICATION_CANCEL payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationCancel {
    pub notification_ids: Vec<String>,
}

/// THEME_SET payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSet {
    pub theme: Theme,
}

/// SEND_MESSAGE payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareMessage {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A request the host knows how to handle, with its typed payload.
#[derive(Debug, Clone, PartialEq)]
pub enum HostRequest {
    AuthSetup(AuthSetup),
    AuthRequest,
    ProfileSave(UserProfile),
    ProfileLoad,
    ScheduleSave(ScheduleSave),
    ScheduleLoad,
    DoseLogSave(DoseLog),
    NotificationSchedule(NotificationSchedule),
    NotificationCancel(NotificationCancel),
    OfflineSync,
    ThemeSet(ThemeSet),
    SendMessage(ShareMessage),
}

impl HostRequest {
    /// Type an inbound message.
    ///
    /// READY and reply events yield [`MessageError::NotARequest`]; a payload
    /// that does not match its event yields [`MessageError::InvalidPayload`].
    pub fn from_message(msg: &BridgeMessage) -> Result<Self> {
        let request = match msg.event {
            EventType::AuthSetup => HostRequest::AuthSetup(msg.payload_as()?),
            EventType::AuthRequest => HostRequest::AuthRequest,
            EventType::ProfileSave => HostRequest::ProfileSave(msg.payload_as()?),
            EventType::ProfileLoad => HostRequest::ProfileLoad,
            EventType::ScheduleSave => HostRequest::ScheduleSave(msg.payload_as()?),
            EventType::ScheduleLoad => HostRequest::ScheduleLoad,
            EventType::DoseLogSave => HostRequest::DoseLogSave(msg.payload_as()?),
            EventType::NotificationSchedule => {
                HostRequest::NotificationSchedule(msg.payload_as()?)
            }
            EventType::NotificationCancel => HostRequest::NotificationCancel(msg.payload_as()?),
            EventType::OfflineSync => HostRequest::OfflineSync,
            EventType::ThemeSet => HostRequest::ThemeSet(msg.payload_as()?),
            EventType::SendMessage => HostRequest::SendMessage(msg.payload_as()?),
            EventType::Ready
            | EventType::AuthResult
            | EventType::ProfileLoadResult
            | EventType::ScheduleLoadResult
            | EventType::DoseLogSaveResult
            | EventType::NotificationResult
            | EventType::OfflineSyncResult
            | EventType::SendMessageResult => return Err(MessageError::NotARequest(msg.event)),
        };
        Ok(request)
    }

    /// Event tag of this request.
    pub fn event(&self) -> EventType {
        match self {
            HostRequest::AuthSetup(_) => EventType::AuthSetup,
            HostRequest::AuthRequest => EventType::AuthRequest,
            HostRequest::ProfileSave(_) => EventType::ProfileSave,
            HostRequest::ProfileLoad => EventType::ProfileLoad,
            HostRequest::ScheduleSave(_) => EventType::ScheduleSave,
            HostRequest::ScheduleLoad => EventType::ScheduleLoad,
            HostRequest::DoseLogSave(_) => EventType::DoseLogSave,
            HostRequest::NotificationSchedule(_) => EventType::NotificationSchedule,
            HostRequest::NotificationCancel(_) => EventType::NotificationCancel,
            HostRequest::OfflineSync => EventType::OfflineSync,
            HostRequest::ThemeSet(_) => EventType::ThemeSet,
            HostRequest::SendMessage(_) => EventType::SendMessage,
        }
    }

    /// Event the host answers this request with, if any.
    pub fn reply_event(&self) -> Option<EventType> {
        reply_event_for(self.event())
    }

    /// Serialize the typed payload.
    pub fn payload(&self) -> Result<Value> {
        let value = match self {
            HostRequest::AuthSetup(p) => serde_json::to_value(p)?,
            HostRequest::ProfileSave(p) => serde_json::to_value(p)?,
            HostRequest::ScheduleSave(p) => serde_json::to_value(p)?,
            HostRequest::DoseLogSave(p) => serde_json::to_value(p)?,
            HostRequest::NotificationSchedule(p) => serde_json::to_value(p)?,
            HostRequest::NotificationCancel(p) => serde_json::to_value(p)?,
            HostRequest::ThemeSet(p) => serde_json::to_value(p)?,
            HostRequest::SendMessage(p) => serde_json::to_value(p)?,
            HostRequest::AuthRequest
            | HostRequest::ProfileLoad
            | HostRequest::ScheduleLoad
            | HostRequest::OfflineSync => Value::Object(Default::default()),
        };
        Ok(value)
    }

    /// Build the outbound message with a fresh request id.
    pub fn into_message(self) -> Result<BridgeMessage> {
        Ok(BridgeMessage::request(self.event(), self.payload()?))
    }
}

/// Reply event the host uses for a request event.
///
/// Returns `None` for fire-and-forget requests (THEME_SET) and for events
/// that are not requests.
pub fn reply_event_for(event: EventType) -> Option<EventType> {
    match event {
        EventType::AuthSetup | EventType::AuthRequest => Some(EventType::AuthResult),
        EventType::ProfileSave | EventType::ProfileLoad => Some(EventType::ProfileLoadResult),
        EventType::ScheduleSave => Some(EventType::NotificationResult),
        EventType::ScheduleLoad => Some(EventType::ScheduleLoadResult),
        EventType::DoseLogSave => Some(EventType::DoseLogSaveResult),
        EventType::NotificationSchedule | EventType::NotificationCancel => {
            Some(EventType::NotificationResult)
        }
        EventType::OfflineSync => Some(EventType::OfflineSyncResult),
        EventType::SendMessage => Some(EventType::SendMessageResult),
        EventType::ThemeSet
        | EventType::Ready
        | EventType::AuthResult
        | EventType::ProfileLoadResult
        | EventType::ScheduleLoadResult
        | EventType::DoseLogSaveResult
        | EventType::NotificationResult
        | EventType::OfflineSyncResult
        | EventType::SendMessageResult => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn types_notification_schedule() {
        let msg = BridgeMessage::request(
            EventType::NotificationSchedule,
            json!({"medicineName": "Aspirin", "scheduledTimes": ["08:00", "20:00"]}),
        );

        let request = HostRequest::from_message(&msg).unwrap();
        let HostRequest::NotificationSchedule(payload) = request else {
            panic!("expected notification schedule");
        };
        assert_eq!(payload.scheduled_times, vec!["08:00", "20:00"]);
        assert!(payload.schedule_id.is_none());
    }

    #[test]
    fn unit_requests_ignore_payload() {
        let msg = BridgeMessage::request(EventType::ProfileLoad, json!({"junk": true}));
        assert_eq!(
            HostRequest::from_message(&msg).unwrap(),
            HostRequest::ProfileLoad
        );
    }

    #[test]
    fn reply_events_are_not_requests() {
        for event in [EventType::Ready, EventType::AuthResult, EventType::NotificationResult] {
            let msg = BridgeMessage::request(event, json!({}));
            assert!(matches!(
                HostRequest::from_message(&msg),
                Err(MessageError::NotARequest(e)) if e == event
            ));
        }
    }

    #[test]
    fn mismatched_payload_is_invalid() {
        let msg = BridgeMessage::request(EventType::NotificationCancel, json!({"ids": []}));
        assert!(matches!(
            HostRequest::from_message(&msg),
            Err(MessageError::InvalidPayload {
                event: EventType::NotificationCancel,
                ..
            })
        ));
    }

    #[test]
    fn into_message_carries_typed_payload() {
        let msg = HostRequest::SendMessage(ShareMessage {
            body: "All doses taken".to_string(),
            title: None,
        })
        .into_message()
        .unwrap();

        assert_eq!(msg.event, EventType::SendMessage);
        assert_eq!(msg.payload, json!({"body": "All doses taken"}));
        assert_eq!(
            HostRequest::from_message(&msg).unwrap().event(),
            EventType::SendMessage
        );
    }

    #[test]
    fn reply_table() {
        assert_eq!(
            reply_event_for(EventType::ProfileSave),
            Some(EventType::ProfileLoadResult)
        );
        assert_eq!(
            reply_event_for(EventType::ScheduleSave),
            Some(EventType::NotificationResult)
        );
        assert_eq!(reply_event_for(EventType::ThemeSet), None);
        assert_eq!(reply_event_for(EventType::Ready), None);
        assert_eq!(HostRequest::AuthRequest.reply_event(), Some(EventType::AuthResult));
    }

    #[test]
    fn auth_setup_debug_redacts_pin_hash() {
        let setup = AuthSetup {
            pin_hash: Some("5e884898da28".to_string()),
            enable_biometric: Some(true),
        };
        let debug = format!("{setup:?}");
        assert!(debug.contains("<redacted:12 bytes>"));
        assert!(!debug.contains("5e884898da28"));
    }
}
