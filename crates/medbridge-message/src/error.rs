use uuid::Uuid;

use crate::event::EventType;

/// Errors that can occur while encoding, decoding or typing bridge messages.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// The raw message is not valid bridge JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The `event` field names an event outside the bridge taxonomy.
    ///
    /// `request_id` is set when the name came from an otherwise well-formed
    /// message.
    #[error("unknown bridge event '{name}'")]
    UnknownEvent {
        name: String,
        request_id: Option<Uuid>,
    },

    /// The event is valid but is not something the host handles as a request.
    #[error("{0} is not a host request")]
    NotARequest(EventType),

    /// The payload does not match the shape required by its event.
    #[error("invalid {event} payload: {source}")]
    InvalidPayload {
        event: EventType,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, MessageError>;
