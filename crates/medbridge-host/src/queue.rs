use std::sync::Arc;

use medbridge_message::{encode, BridgeMessage};
use medbridge_transport::Transport;
use parking_lot::Mutex;
use tracing::{debug, error, warn};

/// What happened to a message handed to [`OutboundQueue::enqueue_or_send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Posted to the transport.
    Sent,
    /// Buffered until the content side reports READY.
    Queued,
    /// Ready, but the surface is not attached; the message is gone.
    Dropped,
}

struct State {
    ready: bool,
    pending: Vec<BridgeMessage>,
}

/// Host → content buffer.
///
/// Messages queue until the first READY, are flushed in FIFO order, and from
/// then on go straight to the transport. Readiness never resets.
pub struct OutboundQueue<T> {
    transport: Arc<T>,
    state: Mutex<State>,
}

impl<T: Transport> OutboundQueue<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            state: Mutex::new(State {
                ready: false,
                pending: Vec::new(),
            }),
        }
    }

    pub fn enqueue_or_send(&self, msg: BridgeMessage) -> Disposition {
        let mut state = self.state.lock();
        if !state.ready {
            debug!(event = %msg.event, request_id = %msg.request_id, "queued until ready");
            state.pending.push(msg);
            return Disposition::Queued;
        }
        // Lock stays held so a concurrent drain cannot interleave.
        self.post(&msg)
    }

    /// Flip to ready and flush the backlog. Returns the number of messages
    /// flushed; a repeated READY flushes nothing.
    pub fn mark_ready(&self) -> usize {
        let mut state = self.state.lock();
        if state.ready {
            debug!("repeated ready ignored");
            return 0;
        }
        state.ready = true;

        let backlog = std::mem::take(&mut state.pending);
        let flushed = backlog.len();
        for msg in &backlog {
            self.post(msg);
        }
        debug!(flushed, "outbound queue drained");
        flushed
    }

    pub fn is_ready(&self) -> bool {
        self.state.lock().ready
    }

    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    fn post(&self, msg: &BridgeMessage) -> Disposition {
        let raw = match encode(msg) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(event = %msg.event, error = %e, "outbound message not encodable");
                return Disposition::Dropped;
            }
        };
        match self.transport.post(&raw) {
            Ok(()) => Disposition::Sent,
            Err(e) if e.is_drop() => {
                warn!(
                    event = %msg.event,
                    request_id = %msg.request_id,
                    error = %e,
                    "no surface attached, outbound message dropped"
                );
                Disposition::Dropped
            }
            Err(e) => {
                error!(
                    event = %msg.event,
                    request_id = %msg.request_id,
                    error = %e,
                    "outbound message not delivered"
                );
                Disposition::Dropped
            }
        }
    }
}

impl<T> std::fmt::Debug for OutboundQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("OutboundQueue")
            .field("ready", &state.ready)
            .field("pending", &state.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use medbridge_message::{decode, EventType};
    use medbridge_transport::channel;
    use serde_json::json;

    use super::*;

    fn msg(n: u32) -> BridgeMessage {
        BridgeMessage::request(EventType::ProfileLoadResult, json!({ "n": n }))
    }

    #[test]
    fn queues_until_ready_then_drains_fifo() {
        let (transport, mut rx) = channel("content");
        let queue = OutboundQueue::new(Arc::new(transport));

        for n in 0..3 {
            assert_eq!(queue.enqueue_or_send(msg(n)), Disposition::Queued);
        }
        assert_eq!(queue.pending_len(), 3);
        assert!(rx.try_recv().is_err());

        assert_eq!(queue.mark_ready(), 3);
        assert!(queue.is_ready());
        assert_eq!(queue.pending_len(), 0);

        for n in 0..3 {
            let raw = rx.try_recv().expect("drained message");
            assert_eq!(decode(&raw).expect("decodes").payload["n"], n);
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn sends_directly_after_ready() {
        let (transport, mut rx) = channel("content");
        let queue = OutboundQueue::new(Arc::new(transport));
        queue.mark_ready();

        assert_eq!(queue.enqueue_or_send(msg(7)), Disposition::Sent);
        assert_eq!(queue.pending_len(), 0);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn repeated_ready_is_idempotent() {
        let (transport, mut rx) = channel("content");
        let queue = OutboundQueue::new(Arc::new(transport));
        queue.enqueue_or_send(msg(1));

        assert_eq!(queue.mark_ready(), 1);
        assert_eq!(queue.mark_ready(), 0);

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn detached_after_ready_drops() {
        let (transport, rx) = channel("content");
        let transport = Arc::new(transport);
        let queue = OutboundQueue::new(Arc::clone(&transport));
        queue.mark_ready();

        transport.detach();
        drop(rx);

        assert_eq!(queue.enqueue_or_send(msg(1)), Disposition::Dropped);
        assert_eq!(queue.pending_len(), 0);
        assert!(queue.is_ready());
    }
}
