use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{MessageError, Result};
use crate::event::EventType;

/// A single message on the bridge.
///
/// A reply reuses the `request_id` of the request it answers; every other
/// message carries a fresh one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeMessage {
    pub event: EventType,
    pub request_id: Uuid,
    pub payload: Value,
    pub timestamp: String,
}

/// Decode-side view that keeps `event` as text so unknown events can be
/// reported separately from malformed JSON.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMessage {
    event: String,
    request_id: Uuid,
    #[serde(default)]
    payload: Value,
    timestamp: String,
}

impl BridgeMessage {
    /// Create a message stamped with the current time.
    pub fn new(event: EventType, request_id: Uuid, payload: Value) -> Self {
        Self {
            event,
            request_id,
            payload,
            timestamp: now_timestamp(),
        }
    }

    /// Create a message with a fresh request id.
    pub fn request(event: EventType, payload: Value) -> Self {
        Self::new(event, Uuid::new_v4(), payload)
    }

    /// The content side's readiness signal.
    pub fn ready() -> Self {
        Self::request(EventType::Ready, Value::Object(Default::default()))
    }

    /// Build a reply correlated with this message.
    pub fn reply(&self, event: EventType, payload: Value) -> Self {
        Self::new(event, self.request_id, payload)
    }

    /// Deserialize the payload into the shape expected for this event.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.payload.clone()).map_err(|source| {
            MessageError::InvalidPayload {
                event: self.event,
                source,
            }
        })
    }
}

/// Current UTC time as ISO-8601 with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serialize a message to its wire JSON.
pub fn encode(message: &BridgeMessage) -> Result<String> {
    Ok(serde_json::to_string(message)?)
}

/// Parse wire JSON into a message.
///
/// Returns [`MessageError::UnknownEvent`] for well-formed messages whose
/// event is outside the taxonomy, and [`MessageError::Json`] for anything
/// that is not a bridge message at all.
pub fn decode(raw: &str) -> Result<BridgeMessage> {
    let wire: WireMessage = serde_json::from_str(raw)?;
    let event = wire.event.parse::<EventType>().map_err(|_| MessageError::UnknownEvent {
        name: wire.event.clone(),
        request_id: Some(wire.request_id),
    })?;
    Ok(BridgeMessage {
        event,
        request_id: wire.request_id,
        payload: wire.payload,
        timestamp: wire.timestamp,
    })
}
