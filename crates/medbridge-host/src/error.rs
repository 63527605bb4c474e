use medbridge_message::MessageError;

/// Errors raised by host-side handlers and collaborators.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The inbound message could not be typed.
    #[error("message error: {0}")]
    Message(#[from] MessageError),

    /// Persisted data could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The local persistent store failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// The secure credential store failed.
    #[error("secure storage error: {0}")]
    SecureStore(String),

    /// The platform notification service failed.
    #[error("notification error: {0}")]
    Notification(String),

    /// The share surface rejected the request (including user dismissal).
    #[error("share failed: {0}")]
    Share(String),

    /// A schedule time was not a valid `HH:MM` string.
    #[error("invalid time '{0}' (expected HH:MM)")]
    InvalidTime(String),
}

pub type Result<T> = std::result::Result<T, HostError>;
