use std::time::Duration;

use medbridge_message::{EventType, MessageError};
use medbridge_transport::TransportError;

/// Errors surfaced to callers of the content-side bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// No reply arrived in time. The pending entry has been evicted.
    #[error("bridge request timed out: {event} after {}ms", .timeout.as_millis())]
    Timeout { event: EventType, timeout: Duration },

    /// The host answered with `{success:false, error}`.
    #[error("host rejected {event}: {error}")]
    Rejected { event: EventType, error: String },

    /// The pending entry was evicted before a reply or timeout.
    #[error("bridge request abandoned")]
    Closed,

    #[error("message error: {0}")]
    Message(#[from] MessageError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
