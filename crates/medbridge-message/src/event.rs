use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MessageError;

/// Closed set of events that may cross the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Ready,
    AuthRequest,
    AuthResult,
    AuthSetup,
    ProfileSave,
    ProfileLoad,
    ProfileLoadResult,
    ScheduleSave,
    ScheduleLoad,
    ScheduleLoadResult,
    DoseLogSave,
    DoseLogSaveResult,
    NotificationSchedule,
    NotificationCancel,
    NotificationResult,
    OfflineSync,
    OfflineSyncResult,
    ThemeSet,
    SendMessage,
    SendMessageResult,
}

impl EventType {
    /// Every event, in taxonomy order.
    pub const ALL: [EventType; 20] = [
        EventType::Ready,
        EventType::AuthRequest,
        EventType::AuthResult,
        EventType::AuthSetup,
        EventType::ProfileSave,
        EventType::ProfileLoad,
        EventType::ProfileLoadResult,
        EventType::ScheduleSave,
        EventType::ScheduleLoad,
        EventType::ScheduleLoadResult,
        EventType::DoseLogSave,
        EventType::DoseLogSaveResult,
        EventType::NotificationSchedule,
        EventType::NotificationCancel,
        EventType::NotificationResult,
        EventType::OfflineSync,
        EventType::OfflineSyncResult,
        EventType::ThemeSet,
        EventType::SendMessage,
        EventType::SendMessageResult,
    ];

    /// Wire name of the event.
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Ready => "READY",
            EventType::AuthRequest => "AUTH_REQUEST",
            EventType::AuthResult => "AUTH_RESULT",
            EventType::AuthSetup => "AUTH_SETUP",
            EventType::ProfileSave => "PROFILE_SAVE",
            EventType::ProfileLoad => "PROFILE_LOAD",
            EventType::ProfileLoadResult => "PROFILE_LOAD_RESULT",
            EventType::ScheduleSave => "SCHEDULE_SAVE",
            EventType::ScheduleLoad => "SCHEDULE_LOAD",
            EventType::ScheduleLoadResult => "SCHEDULE_LOAD_RESULT",
            EventType::DoseLogSave => "DOSE_LOG_SAVE",
            EventType::DoseLogSaveResult => "DOSE_LOG_SAVE_RESULT",
            EventType::NotificationSchedule => "NOTIFICATION_SCHEDULE",
            EventType::NotificationCancel => "NOTIFICATION_CANCEL",
            EventType::NotificationResult => "NOTIFICATION_RESULT",
            EventType::OfflineSync => "OFFLINE_SYNC",
            EventType::OfflineSyncResult => "OFFLINE_SYNC_RESULT",
            EventType::ThemeSet => "THEME_SET",
            EventType::SendMessage => "SEND_MESSAGE",
            EventType::SendMessageResult => "SEND_MESSAGE_RESULT",
        }
    }

    /// Returns true for events that only ever travel host → content as replies.
    pub fn is_reply(self) -> bool {
        matches!(
            self,
            EventType::AuthResult
                | EventType::ProfileLoadResult
                | EventType::ScheduleLoadResult
                | EventType::DoseLogSaveResult
                | EventType::NotificationResult
                | EventType::OfflineSyncResult
                | EventType::SendMessageResult
        )
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = MessageError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|event| event.as_str() == name)
            .ok_or_else(|| MessageError::UnknownEvent {
                name: name.to_string(),
                request_id: None,
            })
    }
}

impl Serialize for EventType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for event in EventType::ALL {
            assert_eq!(event.as_str().parse::<EventType>().unwrap(), event);
        }
    }

    #[test]
    fn unknown_name_rejected() {
        let err = "LOGOUT".parse::<EventType>().unwrap_err();
        assert!(matches!(err, MessageError::UnknownEvent { name, request_id: None } if name == "LOGOUT"));
        assert!("ready".parse::<EventType>().is_err());
    }

    #[test]
    fn serializes_as_wire_name() {
        let json = serde_json::to_string(&EventType::NotificationSchedule).unwrap();
        assert_eq!(json, "\"NOTIFICATION_SCHEDULE\"");
        let back: EventType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EventType::NotificationSchedule);
    }

    #[test]
    fn reply_events() {
        assert!(EventType::AuthResult.is_reply());
        assert!(EventType::SendMessageResult.is_reply());
        assert!(!EventType::Ready.is_reply());
        assert!(!EventType::ThemeSet.is_reply());
    }
}
