use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// In-process transport backed by an unbounded tokio channel.
///
/// The sending half can be detached and re-attached to model a rendering
/// surface that is torn down and mounted again. Each attach creates a fresh
/// receiver; anything posted while detached is dropped.
pub struct ChannelTransport {
    label: &'static str,
    sender: Mutex<Option<mpsc::UnboundedSender<String>>>,
}

/// Create an attached transport and its receiving end.
pub fn channel(label: &'static str) -> (ChannelTransport, mpsc::UnboundedReceiver<String>) {
    let transport = ChannelTransport::detached(label);
    let receiver = transport.attach();
    (transport, receiver)
}

impl ChannelTransport {
    /// Create a transport with no receiver attached yet.
    pub fn detached(label: &'static str) -> Self {
        Self {
            label,
            sender: Mutex::new(None),
        }
    }

    /// Attach a new receiving surface, replacing any previous one.
    pub fn attach(&self) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.sender.lock() = Some(tx);
        tracing::debug!(transport = self.label, "surface attached");
        rx
    }

    /// Detach the current receiving surface.
    pub fn detach(&self) {
        if self.sender.lock().take().is_some() {
            tracing::debug!(transport = self.label, "surface detached");
        }
    }

    /// Diagnostic label for this direction.
    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl Transport for ChannelTransport {
    fn post(&self, raw: &str) -> Result<()> {
        let guard = self.sender.lock();
        let sender = guard.as_ref().ok_or(TransportError::Detached)?;
        sender
            .send(raw.to_string())
            .map_err(|_| TransportError::Closed)
    }

    fn is_attached(&self) -> bool {
        self.sender
            .lock()
            .as_ref()
            .is_some_and(|sender| !sender.is_closed())
    }
}

impl std::fmt::Debug for ChannelTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelTransport")
            .field("label", &self.label)
            .field("attached", &self.is_attached())
            .finish()
    }
}
