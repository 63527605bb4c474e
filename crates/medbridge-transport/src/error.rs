/// Errors that can occur when handing a message to a transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No receiving surface is currently attached.
    #[error("transport detached (no receiving surface)")]
    Detached,

    /// The receiving end was dropped.
    #[error("transport closed")]
    Closed,

    /// A script envelope could not be built or parsed.
    #[error("invalid script envelope: {0}")]
    Envelope(String),
}

impl TransportError {
    /// True when the failure means "nobody was listening", which the bridge
    /// treats as a silent drop rather than an error.
    pub fn is_drop(&self) -> bool {
        matches!(self, TransportError::Detached | TransportError::Closed)
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
