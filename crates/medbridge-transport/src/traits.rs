use std::sync::Arc;

use crate::error::Result;

/// A one-way, fire-and-forget delivery channel for serialized messages.
///
/// Implementations preserve FIFO order per sender and nothing else: there is
/// no acknowledgment, and a message posted while the recipient is not
/// attached is lost. Callers that need confirmation must build it at the
/// application level (READY handshake, request correlation).
pub trait Transport: Send + Sync {
    /// Hand one serialized message to the transport.
    fn post(&self, raw: &str) -> Result<()>;

    /// Whether a receiving surface is currently attached.
    fn is_attached(&self) -> bool;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn post(&self, raw: &str) -> Result<()> {
        (**self).post(raw)
    }

    fn is_attached(&self) -> bool {
        (**self).is_attached()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn post(&self, raw: &str) -> Result<()> {
        (**self).post(raw)
    }

    fn is_attached(&self) -> bool {
        (**self).is_attached()
    }
}
